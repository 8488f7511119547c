//! Image classification service backed by a pretrained ONNX model.
//!
//! The crate wires four pieces together: a [`classifier::Classifier`] that
//! wraps the model and reduces its output to top-k predictions, an upload
//! [`store::UploadStore`] for user-submitted images, a SQLite-backed
//! [`comparison`] log that replays labeled datasets and records correctness,
//! and an axum [`server`] exposing the upload/classify HTTP surface.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use colorseason::classifier::Classifier;
//!
//! let classifier = Classifier::builder()
//!     .with_model_file("model/model.onnx")?
//!     .with_labels_file("model/labels.txt")?
//!     .build()?;
//!
//! let prediction = classifier.classify("photo.jpg")?;
//! println!("{} ({:.2})", prediction.class_label, prediction.class_probability);
//! # Ok(())
//! # }
//! ```
//!
//! The handle is loaded once per process and reused; its forward pass reuses
//! internal buffers, so concurrent calls must be serialized (the server does
//! this with a `tokio::sync::Mutex`).

pub mod classifier;
pub mod comparison;
pub mod config;
pub mod runtime;
pub mod server;
pub mod store;

pub use classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, Prediction};
pub use config::AppConfig;
pub use runtime::{create_session_builder, RuntimeConfig};
pub use server::{router, AppState};
pub use store::{allowed_file, UploadStore};

pub fn init_logger() {
    env_logger::init();
}
