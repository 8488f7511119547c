use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::{Multipart, Path as UrlPath, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;

use super::error::ServerError;
use super::pages;
use super::AppState;
use crate::classifier::Prediction;
use crate::comparison;
use crate::store::allowed_file;

/// Path-segment substring required by the constrained file-serving endpoint.
const SERVING_PATH_MARKER: &str = "colorseason/";

/// Why a multipart upload was rejected. The message doubles as the flash
/// text for the web form and the error body for the JSON API.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum UploadRejection {
    NoFilePart,
    NoSelectedFile,
    DisallowedFiletype,
    EmptyPayload,
    Malformed,
}

impl UploadRejection {
    pub(crate) fn message(&self) -> &'static str {
        match self {
            UploadRejection::NoFilePart => "No file part",
            UploadRejection::NoSelectedFile => "No selected file",
            UploadRejection::DisallowedFiletype => "This filetype is not allowed",
            UploadRejection::EmptyPayload => "Empty file",
            UploadRejection::Malformed => "Malformed upload",
        }
    }
}

/// Validates an upload's original filename and payload.
pub(crate) fn validate_upload(filename: &str, len: usize) -> Result<(), UploadRejection> {
    if filename.is_empty() {
        return Err(UploadRejection::NoSelectedFile);
    }
    if !allowed_file(filename) {
        return Err(UploadRejection::DisallowedFiletype);
    }
    if len == 0 {
        return Err(UploadRejection::EmptyPayload);
    }
    Ok(())
}

/// Pulls the `image` field out of a multipart body.
async fn read_image_field(multipart: &mut Multipart) -> Result<(String, Bytes), UploadRejection> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| UploadRejection::Malformed)?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|_| UploadRejection::Malformed)?;
        validate_upload(&filename, bytes.len())?;
        return Ok((filename, bytes));
    }
    Err(UploadRejection::NoFilePart)
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

async fn file_response(path: &Path) -> Result<Response, ServerError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| ServerError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, content_type_for(path))], bytes).into_response())
}

fn flash_redirect(message: &str) -> Redirect {
    Redirect::to(&format!("/?m={}", urlencoding::encode(message)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexParams {
    m: Option<String>,
}

pub(crate) async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    let images = state.store.list();
    Html(pages::index_page(&images, params.m.as_deref()))
}

pub(crate) async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, ServerError> {
    let (filename, bytes) = match read_image_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(rejection) => return Ok(flash_redirect(rejection.message())),
    };
    let stored = state.store.save(&filename, &bytes)?;
    Ok(Redirect::to(&format!("/classify/{}", stored.filename)))
}

pub(crate) async fn uploaded_file(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Response, ServerError> {
    let path = state.store.path_of(&filename).ok_or(ServerError::NotFound)?;
    file_response(&path).await
}

pub(crate) async fn classify_view(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Html<String>, ServerError> {
    let path = state.store.path_of(&filename).ok_or(ServerError::NotFound)?;
    if !path.is_file() {
        return Err(ServerError::NotFound);
    }

    let prediction = classify_stored(&state, &path).await?;
    Ok(Html(pages::classify_page(&filename, &prediction)))
}

pub(crate) async fn clear_uploads(State(state): State<AppState>) -> Redirect {
    state.store.purge();
    Redirect::to("/")
}

pub(crate) async fn test_api_page() -> Html<&'static str> {
    Html(pages::TEST_API_PAGE)
}

pub(crate) async fn api_classify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Prediction>, ServerError> {
    let (filename, bytes) = read_image_field(&mut multipart)
        .await
        .map_err(|rejection| ServerError::BadRequest(rejection.message().to_string()))?;
    let stored = state.store.save(&filename, &bytes)?;
    let prediction = classify_stored(&state, &stored.path).await?;
    Ok(Json(prediction))
}

pub(crate) async fn comparison_results(
    State(state): State<AppState>,
) -> Result<Html<String>, ServerError> {
    let records = comparison::all_records(&state.pool).await?;
    let summary = comparison::summary(&state.pool).await?;
    Ok(Html(pages::comparison_page(&records, &summary)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServeFileParams {
    #[serde(default)]
    f: String,
}

/// Serves a file from an arbitrary path, constrained to paths containing the
/// `colorseason/` segment. Everything else is a 404.
pub(crate) async fn serve_result_file(
    Query(params): Query<ServeFileParams>,
) -> Result<Response, ServerError> {
    let path = resolve_serving_path(&params.f).ok_or(ServerError::NotFound)?;
    file_response(&path).await
}

pub(crate) fn resolve_serving_path(requested: &str) -> Option<PathBuf> {
    if !requested.contains(SERVING_PATH_MARKER) {
        return None;
    }
    Some(PathBuf::from("/").join(requested.trim_start_matches('/')))
}

/// Runs one classification while holding the model lock: the session reuses
/// internal buffers, so calls are serialized here.
async fn classify_stored(state: &AppState, path: &Path) -> Result<Prediction, ServerError> {
    let classifier = state.classifier.lock().await;
    Ok(classifier.classify(path)?)
}
