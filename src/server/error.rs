use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error type for the HTTP surface.
///
/// Validation failures become 400s with a JSON body, missing resources
/// become 404s, and everything else is logged and collapsed into a 500.
#[derive(Debug)]
pub enum ServerError {
    BadRequest(String),
    NotFound,
    Internal(anyhow::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ServerError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ServerError::Internal(err) => {
                log::error!("Request failed: {:#}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ServerError::Internal(err.into())
    }
}
