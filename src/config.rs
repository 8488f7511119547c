use std::env;
use std::path::PathBuf;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

const DEFAULT_MODEL_DIR: &str = "model";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_DATABASE: &str = "colorseason.sqlite3";

/// Application configuration, resolved once at startup.
///
/// Each location resolves in order: command-line flag, `COLORSEASON_*`
/// environment variable, built-in default.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub database_path: PathBuf,
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var(var).ok().map(PathBuf::from)
}

impl AppConfig {
    pub fn resolve(
        model_dir: Option<PathBuf>,
        upload_dir: Option<PathBuf>,
        database: Option<PathBuf>,
    ) -> Self {
        Self {
            model_dir: model_dir
                .or_else(|| env_path("COLORSEASON_MODEL_DIR"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR)),
            upload_dir: upload_dir
                .or_else(|| env_path("COLORSEASON_UPLOAD_DIR"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            database_path: database
                .or_else(|| env_path("COLORSEASON_DATABASE"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
        }
    }

    /// Path of the ONNX model file inside the model directory.
    pub fn model_file(&self) -> PathBuf {
        self.model_dir.join("model.onnx")
    }

    /// Path of the label table inside the model directory.
    pub fn labels_file(&self) -> PathBuf {
        self.model_dir.join("labels.txt")
    }

    /// Opens the SQLite pool, creating the database file if needed.
    pub async fn connect_pool(&self) -> sqlx::Result<SqlitePool> {
        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true);
        SqlitePoolOptions::new().connect_with(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_win() {
        let config = AppConfig::resolve(
            Some(PathBuf::from("/opt/model")),
            Some(PathBuf::from("/var/uploads")),
            Some(PathBuf::from("/var/db.sqlite3")),
        );
        assert_eq!(config.model_file(), PathBuf::from("/opt/model/model.onnx"));
        assert_eq!(
            config.labels_file(),
            PathBuf::from("/opt/model/labels.txt")
        );
        assert_eq!(config.upload_dir, PathBuf::from("/var/uploads"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(None, None, None);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE));
    }
}
