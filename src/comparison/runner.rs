use std::io;
use std::path::Path;

use ::log::info;
use sqlx::SqlitePool;
use thiserror::Error;

use super::filelist::read_filelist;
use super::log::{self, NewComparisonRecord, Phase};
use crate::classifier::{Classifier, ClassifierError};

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("Failed to read dataset list: {0}")]
    Filelist(#[from] io::Error),
    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Replays labeled dataset splits through the classifier and appends one
/// comparison record per image.
///
/// Images already present in the log (keyed by filepath) are skipped, so an
/// interrupted run resumes where it left off. Processing is sequential and
/// each record is committed on its own; a crash loses at most the in-flight
/// image. A wrong prediction is a recorded outcome, not an error.
pub async fn run_comparison(
    pool: &SqlitePool,
    classifier: &Classifier,
    splits: &[(&Path, Phase)],
) -> Result<(), ComparisonError> {
    for (list_path, phase) in splits {
        let entries = read_filelist(list_path)?;
        info!(
            "Replaying {} images from {} ({} split)",
            entries.len(),
            list_path.display(),
            phase
        );

        for entry in entries {
            if log::record_exists(pool, &entry.filepath).await? {
                info!("==> Image skipped ({}).", entry.filepath);
                continue;
            }

            let prediction = classifier.classify(&entry.filepath)?;
            let record =
                NewComparisonRecord::from_prediction(*phase, &entry.filepath, entry.class_id, &prediction);
            log::insert_record(pool, &record).await?;
            info!(
                "==> Image processed (\"{}\"), status: {}.",
                entry.filepath,
                record.status_str()
            );
        }
    }
    info!("Comparison is completed.");
    Ok(())
}
