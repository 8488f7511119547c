pub mod filelist;
pub mod log;
pub mod runner;

pub use filelist::{read_filelist, DatasetEntry};
pub use runner::{run_comparison, ComparisonError};
pub use self::log::{
    all_records, init_db, insert_record, record_exists, summary, ComparisonRecord,
    ComparisonSummary, NewComparisonRecord, Phase,
};
