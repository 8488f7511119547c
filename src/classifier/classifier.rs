use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use ndarray::Axis;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ClassifierError;
use super::labels::LabelTable;
use super::prediction::Prediction;
use super::preprocess::Preprocessor;

/// An image classifier wrapping a pretrained ONNX model.
///
/// The handle is built once per process through [`ClassifierBuilder`]
/// (`Classifier::builder()`) and reused across requests; there is no
/// per-request re-initialization. The session holds mutable working buffers
/// that are reused per call, so concurrent `classify` calls on the same
/// handle must be serialized externally (the HTTP layer holds the handle
/// behind a `tokio::sync::Mutex`).
///
/// [`ClassifierBuilder`]: super::builder::ClassifierBuilder
#[derive(Debug)]
pub struct Classifier {
    pub model_path: String,
    pub labels_path: String,
    pub(crate) session: Arc<Session>,
    pub(crate) labels: Arc<LabelTable>,
    pub(crate) preprocessor: Preprocessor,
    pub(crate) input_name: String,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            labels_path: self.labels_path.clone(),
            num_classes: self.labels.len(),
            input_size: self.preprocessor.input_size(),
        }
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Classifies the image at `path`.
    ///
    /// Loads and decodes the image, applies the fixed preprocessing pipeline,
    /// runs a forward pass, and reduces the output probability vector to a
    /// [`Prediction`] (arg-max plus the five highest-probability classes,
    /// ties broken by lower class id).
    ///
    /// # Errors
    /// - `ImageError` if the file cannot be read or decoded
    /// - `ModelError` if the forward pass fails
    /// - `PredictionError` if the output cannot be reduced
    pub fn classify<P: AsRef<Path>>(&self, path: P) -> Result<Prediction, ClassifierError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| {
            ClassifierError::ImageError(format!("Failed to load {}: {}", path.display(), e))
        })?;
        self.classify_image(&image)
    }

    /// Classifies an already-decoded image.
    pub fn classify_image(
        &self,
        image: &image::DynamicImage,
    ) -> Result<Prediction, ClassifierError> {
        let input = self.preprocessor.prepare(image);
        let input_dyn = input.into_dyn();
        let input_view = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(&input_view).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e))
        })?;

        if output_tensor.ndim() < 2 {
            return Err(ClassifierError::PredictionError(format!(
                "Expected a batched probability output, got {} dimension(s)",
                output_tensor.ndim()
            )));
        }

        // Probability vector for the single image in the batch
        let probabilities: Vec<f32> = output_tensor
            .index_axis(Axis(0), 0)
            .iter()
            .copied()
            .collect();

        Prediction::from_probabilities(&probabilities, &self.labels)
    }
}
