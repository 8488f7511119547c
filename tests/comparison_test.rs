use colorseason::classifier::Prediction;
use colorseason::comparison::{
    all_records, init_db, insert_record, record_exists, summary, NewComparisonRecord, Phase,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    init_db(&pool).await.expect("Failed to initialize schema");
    pool
}

fn prediction(class_id: usize, probability: f32) -> Prediction {
    Prediction {
        class_id,
        class_label: format!("class-{}", class_id),
        class_probability: probability,
        top_inds: vec![(probability, format!("class-{}", class_id))],
    }
}

#[tokio::test]
async fn test_init_db_is_idempotent() {
    let pool = test_pool().await;
    init_db(&pool).await.unwrap();
    assert_eq!(summary(&pool).await.unwrap().total, 0);
}

#[tokio::test]
async fn test_insert_and_lookup_by_filepath() {
    let pool = test_pool().await;
    let record =
        NewComparisonRecord::from_prediction(Phase::Train, "/data/a.jpg", 2, &prediction(2, 0.9));

    assert!(!record_exists(&pool, "/data/a.jpg").await.unwrap());
    insert_record(&pool, &record).await.unwrap();
    assert!(record_exists(&pool, "/data/a.jpg").await.unwrap());
    assert!(!record_exists(&pool, "/data/b.jpg").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_filepath_is_rejected() {
    let pool = test_pool().await;
    let record =
        NewComparisonRecord::from_prediction(Phase::Train, "/data/a.jpg", 2, &prediction(2, 0.9));

    insert_record(&pool, &record).await.unwrap();
    assert!(insert_record(&pool, &record).await.is_err());
}

#[tokio::test]
async fn test_replay_skips_already_logged_filepaths() {
    let pool = test_pool().await;
    let listed = ["/data/a.jpg", "/data/b.jpg", "/data/a.jpg"];

    // The replay loop's contract: consult the log before processing.
    let mut processed = Vec::new();
    for filepath in listed {
        if record_exists(&pool, filepath).await.unwrap() {
            continue;
        }
        let record =
            NewComparisonRecord::from_prediction(Phase::Test, filepath, 0, &prediction(0, 0.5));
        insert_record(&pool, &record).await.unwrap();
        processed.push(filepath);
    }

    assert_eq!(processed, vec!["/data/a.jpg", "/data/b.jpg"]);
    assert_eq!(summary(&pool).await.unwrap().total, 2);
}

#[tokio::test]
async fn test_status_derivation() {
    let matched =
        NewComparisonRecord::from_prediction(Phase::Train, "/data/a.jpg", 3, &prediction(3, 0.8));
    assert_eq!(matched.status_str(), "true");

    let mismatched =
        NewComparisonRecord::from_prediction(Phase::Train, "/data/b.jpg", 3, &prediction(1, 0.8));
    assert_eq!(mismatched.status_str(), "false");
}

#[tokio::test]
async fn test_summary_counts() {
    let pool = test_pool().await;
    let rows = [
        (Phase::Train, "/data/a.jpg", 0, 0),
        (Phase::Train, "/data/b.jpg", 0, 1),
        (Phase::Test, "/data/c.jpg", 2, 2),
        (Phase::Test, "/data/d.jpg", 2, 3),
        (Phase::Test, "/data/e.jpg", 4, 4),
    ];
    for (phase, filepath, origin, defined) in rows {
        let record = NewComparisonRecord::from_prediction(
            phase,
            filepath,
            origin,
            &prediction(defined as usize, 0.7),
        );
        insert_record(&pool, &record).await.unwrap();
    }

    let counts = summary(&pool).await.unwrap();
    assert_eq!(counts.total, 5);
    assert_eq!(counts.train, 2);
    assert_eq!(counts.test, 3);
    assert_eq!(counts.correct, 3);
    assert_eq!(counts.incorrect, 2);
}

#[tokio::test]
async fn test_records_carry_serialized_top_and_timestamp() {
    let pool = test_pool().await;
    let record =
        NewComparisonRecord::from_prediction(Phase::Test, "/data/deep/path/a.jpg", 1, &prediction(1, 0.6));
    insert_record(&pool, &record).await.unwrap();

    let records = all_records(&pool).await.unwrap();
    assert_eq!(records.len(), 1);
    let stored = &records[0];
    assert_eq!(stored.filename, "a.jpg");
    assert_eq!(stored.phase, "test");
    assert_eq!(stored.status, "true");

    let top: Vec<(f32, String)> = serde_json::from_str(&stored.defined_top).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].1, "class-1");

    // "%Y-%m-%d %H:%M:%S"
    assert_eq!(stored.time_processed.len(), 19);
}
