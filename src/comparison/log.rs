use std::fmt;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::classifier::Prediction;

const SCHEMA: &str = include_str!("schema.sql");

/// Dataset split a comparison record belongs to. Bookkeeping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Train,
    Test,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Train => "train",
            Phase::Test => "test",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification outcome for a labeled dataset image. Append-only; the
/// presence of a record for a filepath means the replay skips that file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComparisonRecord {
    pub comparison_id: i64,
    pub phase: String,
    pub filename: String,
    pub filepath: String,
    pub origin_class: i64,
    pub status: String,
    pub defined_class: i64,
    pub defined_probability: f64,
    pub defined_top: String,
    pub time_processed: String,
}

/// A record about to be appended to the log.
#[derive(Debug, Clone)]
pub struct NewComparisonRecord {
    pub phase: Phase,
    pub filename: String,
    pub filepath: String,
    pub origin_class: i64,
    pub status: bool,
    pub defined_class: i64,
    pub defined_probability: f64,
    pub defined_top: String,
}

impl NewComparisonRecord {
    /// Derives a record from a prediction and its ground-truth class id.
    /// `status` holds whether the predicted class matched.
    pub fn from_prediction(
        phase: Phase,
        filepath: &str,
        origin_class: i64,
        prediction: &Prediction,
    ) -> Self {
        let filename = filepath
            .rsplit('/')
            .next()
            .unwrap_or(filepath)
            .to_string();
        Self {
            phase,
            filename,
            filepath: filepath.to_string(),
            origin_class,
            status: prediction.class_id as i64 == origin_class,
            defined_class: prediction.class_id as i64,
            defined_probability: f64::from(prediction.class_probability),
            defined_top: serde_json::to_string(&prediction.top_inds).unwrap_or_default(),
        }
    }

    pub fn status_str(&self) -> &'static str {
        if self.status {
            "true"
        } else {
            "false"
        }
    }
}

/// Aggregate counts over the comparison log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ComparisonSummary {
    pub total: i64,
    pub train: i64,
    pub test: i64,
    pub correct: i64,
    pub incorrect: i64,
}

/// Creates the `image_comparison` table if it does not exist yet.
pub async fn init_db(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Returns true if a record for this filepath has already been logged.
pub async fn record_exists(pool: &SqlitePool, filepath: &str) -> sqlx::Result<bool> {
    let row: Option<i64> =
        sqlx::query_scalar("select comparison_id from image_comparison where filepath = ?")
            .bind(filepath)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

/// Appends one record with a UTC timestamp. Auto-committed; each processed
/// image is durable on its own.
pub async fn insert_record(pool: &SqlitePool, record: &NewComparisonRecord) -> sqlx::Result<()> {
    let time_processed = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    sqlx::query(
        "insert into image_comparison \
         (phase, filename, filepath, origin_class, status, defined_class, \
          defined_probability, defined_top, time_processed) \
         values (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(record.phase.as_str())
    .bind(&record.filename)
    .bind(&record.filepath)
    .bind(record.origin_class)
    .bind(record.status_str())
    .bind(record.defined_class)
    .bind(record.defined_probability)
    .bind(&record.defined_top)
    .bind(time_processed)
    .execute(pool)
    .await?;
    Ok(())
}

/// All records in the aggregate view's ordering.
pub async fn all_records(pool: &SqlitePool) -> sqlx::Result<Vec<ComparisonRecord>> {
    sqlx::query_as::<_, ComparisonRecord>(
        "select * from image_comparison \
         order by origin_class, phase, status, defined_probability desc",
    )
    .fetch_all(pool)
    .await
}

/// Aggregate counts via simple counting queries.
pub async fn summary(pool: &SqlitePool) -> sqlx::Result<ComparisonSummary> {
    let total: i64 = sqlx::query_scalar("select count(comparison_id) from image_comparison")
        .fetch_one(pool)
        .await?;
    let train: i64 = sqlx::query_scalar(
        "select count(comparison_id) from image_comparison where phase = 'train'",
    )
    .fetch_one(pool)
    .await?;
    let correct: i64 = sqlx::query_scalar(
        "select count(comparison_id) from image_comparison where status = 'true'",
    )
    .fetch_one(pool)
    .await?;
    Ok(ComparisonSummary {
        total,
        train,
        test: total - train,
        correct,
        incorrect: total - correct,
    })
}
