mod classifier;
mod error;
mod labels;
pub mod builder;
pub mod prediction;
pub mod preprocess;

pub use builder::ClassifierBuilder;
pub use classifier::Classifier;
pub use error::ClassifierError;
pub use labels::LabelTable;
pub use prediction::{Prediction, TOP_K};

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the label table file
    pub labels_path: String,
    /// Number of classes the classifier distinguishes
    pub num_classes: usize,
    /// Width and height the model expects its input in
    pub input_size: (u32, u32),
}
