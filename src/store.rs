use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::warn;
use thiserror::Error;

/// Extensions accepted for uploaded images.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Filename has no extension: {0}")]
    MissingExtension(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Returns true if the filename carries an allowed image extension.
///
/// Matching is case-insensitive; a filename without a dot is rejected.
pub fn allowed_file(filename: &str) -> bool {
    let filename = filename.to_lowercase();
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext),
        None => false,
    }
}

/// Generates a collision-resistant stored filename for an upload: a
/// microsecond-precision UTC timestamp plus the original extension,
/// lowercased.
pub fn new_filename(original: &str) -> Result<String, StoreError> {
    let original = original.to_lowercase();
    let (_, ext) = original
        .rsplit_once('.')
        .ok_or_else(|| StoreError::MissingExtension(original.clone()))?;
    let stamp = Utc::now().format("%Y%m%d%H%M%S%6f");
    Ok(format!("{}.{}", stamp, ext))
}

/// An image persisted to the upload directory. Never mutated after creation;
/// removed only by [`UploadStore::purge`].
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub path: PathBuf,
}

/// Flat filesystem directory holding user-submitted images.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists an upload under a freshly generated timestamped filename,
    /// creating the directory if needed.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<UploadedImage, StoreError> {
        fs::create_dir_all(&self.dir)?;
        let filename = new_filename(original_name)?;
        let path = self.dir.join(&filename);
        fs::write(&path, bytes)?;
        Ok(UploadedImage { filename, path })
    }

    /// Lists the allowed image files currently stored, in directory order.
    pub fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        let mut images = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if allowed_file(&name) && entry.path().is_file() {
                images.push(name);
            }
        }
        images
    }

    /// Resolves a stored filename to its path, rejecting names that try to
    /// escape the upload directory.
    pub fn path_of(&self, filename: &str) -> Option<PathBuf> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return None;
        }
        Some(self.dir.join(filename))
    }

    /// Removes every file in the upload directory. Per-file failures are
    /// logged and do not abort the purge of the remaining files.
    pub fn purge(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}
