use serde::Serialize;

use super::error::ClassifierError;
use super::labels::LabelTable;

/// Number of (probability, label) pairs reported per classification.
pub const TOP_K: usize = 5;

/// The outcome of classifying a single image. Immutable once produced.
///
/// The field names are the JSON wire contract of the classification API:
/// `class_id`, `class_label`, `class_probability`, `top_inds`.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Arg-max index into the label table
    pub class_id: usize,
    /// Label at the arg-max index
    pub class_label: String,
    /// Probability of the arg-max class, in [0, 1]
    pub class_probability: f32,
    /// The five highest-probability (probability, label) pairs, sorted
    /// descending by probability
    pub top_inds: Vec<(f32, String)>,
}

/// Ranks a probability vector: indices sorted by probability descending,
/// equal probabilities ordered by lower class id first.
///
/// The tie-break makes the reduction fully deterministic; the upstream
/// behavior of argsort on floating-point ties was unspecified.
pub fn rank_probabilities(probabilities: &[f32]) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    ranked
}

impl Prediction {
    /// Reduces a model output probability vector to a `Prediction`.
    ///
    /// # Errors
    /// - `PredictionError` if the vector is empty
    /// - `PredictionError` if the vector is longer than the label table
    ///   (mismatched model and label resources)
    pub fn from_probabilities(
        probabilities: &[f32],
        labels: &LabelTable,
    ) -> Result<Self, ClassifierError> {
        if probabilities.is_empty() {
            return Err(ClassifierError::PredictionError(
                "Model produced an empty probability vector".into(),
            ));
        }
        if probabilities.len() > labels.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Model produced {} probabilities but the label table has {} entries",
                probabilities.len(),
                labels.len()
            )));
        }

        let ranked = rank_probabilities(probabilities);
        let (class_id, class_probability) = ranked[0];

        let top_inds = ranked
            .iter()
            .take(TOP_K)
            .map(|&(id, p)| {
                let label = labels
                    .get(id)
                    .expect("ranked indices are bounded by the probability vector length");
                (p, label.to_string())
            })
            .collect();

        Ok(Self {
            class_id,
            class_label: labels
                .get(class_id)
                .expect("arg-max index is bounded by the probability vector length")
                .to_string(),
            class_probability,
            top_inds,
        })
    }
}
