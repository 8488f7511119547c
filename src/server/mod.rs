use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::classifier::Classifier;
use crate::store::UploadStore;

pub mod error;
mod handlers;
mod pages;

pub use error::ServerError;

/// Upload size limit.
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// Shared application context, constructed once at startup and injected into
/// every handler. The classifier sits behind a mutex because the model's
/// working buffers are reused across forward passes.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Mutex<Classifier>>,
    pub pool: SqlitePool,
    pub store: Arc<UploadStore>,
}

impl AppState {
    pub fn new(classifier: Classifier, pool: SqlitePool, store: UploadStore) -> Self {
        Self {
            classifier: Arc::new(Mutex::new(classifier)),
            pool,
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::upload))
        .route("/uploads/{filename}", get(handlers::uploaded_file))
        .route("/classify/{filename}", get(handlers::classify_view))
        .route("/clear-uploads/", get(handlers::clear_uploads))
        .route("/test_api/", get(handlers::test_api_page))
        .route("/api/1.0/classify/", post(handlers::api_classify))
        .route("/comparison_results/", get(handlers::comparison_results))
        .route("/images/", get(handlers::serve_result_file))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(state)
}
