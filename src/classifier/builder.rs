use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};
use ort::session::Session;

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::labels::LabelTable;
use super::preprocess::{Preprocessor, DEFAULT_INPUT_SIZE, DEFAULT_MEAN_BGR};
use crate::runtime::{create_session_builder, RuntimeConfig};

const DEFAULT_INPUT_NAME: &str = "data";

/// A builder for constructing a Classifier with a fluent interface.
///
/// All resources are loaded and validated up front: a missing model or label
/// file fails the corresponding `with_*` call, so the entry point can surface
/// the error before the service accepts any requests.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<PathBuf>,
    labels_path: Option<PathBuf>,
    session: Option<Session>,
    labels: Option<LabelTable>,
    input_size: Option<(u32, u32)>,
    mean_bgr: Option<[f32; 3]>,
    input_name: Option<String>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX model execution
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads the ONNX model from a file and validates its structure.
    ///
    /// # Errors
    /// - `BuildError` if a model is already set
    /// - `BuildError` if the file does not exist
    /// - `BuildError` if the session cannot be created
    /// - `ModelError` if the model has no inputs or no outputs
    pub fn with_model_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ClassifierError> {
        if self.model_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Model path already set".to_string(),
            ));
        }

        let path = path.as_ref();
        if !path.exists() {
            return Err(ClassifierError::BuildError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        // Create session using the singleton environment
        let session = create_session_builder(&self.runtime_config)?.commit_from_file(path)?;

        Self::validate_model(&session)?;
        info!("Model loaded from {}", path.display());

        self.model_path = Some(path.to_path_buf());
        self.session = Some(session);
        Ok(self)
    }

    /// Loads the label table from a text file, one label per line.
    ///
    /// # Errors
    /// - `BuildError` if labels are already set
    /// - `LabelError` if the file is missing, unreadable, or empty
    pub fn with_labels_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ClassifierError> {
        if self.labels_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Labels path already set".to_string(),
            ));
        }

        let path = path.as_ref();
        let labels = LabelTable::from_file(path).map_err(|e| {
            error!("Failed to load labels: {}", e);
            e
        })?;
        info!("Loaded {} labels from {}", labels.len(), path.display());

        self.labels_path = Some(path.to_path_buf());
        self.labels = Some(labels);
        Ok(self)
    }

    /// Overrides the model input size (default 227x227).
    pub fn with_input_size(mut self, width: u32, height: u32) -> Self {
        self.input_size = Some((width, height));
        self
    }

    /// Overrides the precomputed per-channel BGR mean subtracted during
    /// preprocessing.
    pub fn with_mean(mut self, mean_bgr: [f32; 3]) -> Self {
        self.mean_bgr = Some(mean_bgr);
        self
    }

    /// Overrides the model's input tensor name (default `"data"`).
    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Errors
    /// - `BuildError` if no model has been loaded
    /// - `BuildError` if no label table has been loaded
    pub fn build(mut self) -> Result<Classifier, ClassifierError> {
        let session = self
            .session
            .take()
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?;
        let labels = self
            .labels
            .take()
            .ok_or_else(|| ClassifierError::BuildError("No label table loaded".into()))?;

        let (width, height) = self.input_size.unwrap_or(DEFAULT_INPUT_SIZE);
        let mean_bgr = self.mean_bgr.unwrap_or(DEFAULT_MEAN_BGR);

        Ok(Classifier {
            model_path: self
                .model_path
                .take()
                .expect("model path is set together with the session")
                .to_string_lossy()
                .to_string(),
            labels_path: self
                .labels_path
                .take()
                .expect("labels path is set together with the label table")
                .to_string_lossy()
                .to_string(),
            session: Arc::new(session),
            labels: Arc::new(labels),
            preprocessor: Preprocessor::new(width, height, mean_bgr),
            input_name: self
                .input_name
                .take()
                .unwrap_or_else(|| DEFAULT_INPUT_NAME.to_string()),
        })
    }

    /// Validates that the model has the expected input/output structure
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        if session.inputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 input for the image tensor".to_string(),
            ));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for the probability vector".to_string(),
            ));
        }
        Ok(())
    }
}
