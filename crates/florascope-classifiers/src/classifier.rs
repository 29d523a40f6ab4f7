//! Classifier trait and common types

use florascope_core::ModelError;

/// Result type for operations inside a classifier
pub type InferenceResult<T> = std::result::Result<T, ModelError>;

/// Trait for all loaded classifiers
///
/// Label inference is mandatory. Probability inference is a capability:
/// callers check [`Classifier::supports_probabilities`] before asking for a
/// distribution.
pub trait Classifier: Send + Sync {
    /// Predict the class identifier for one feature vector
    fn predict(&self, features: &[f64]) -> InferenceResult<usize>;

    /// Whether [`Classifier::predict_proba`] is available
    fn supports_probabilities(&self) -> bool {
        false
    }

    /// One probability per class, in the order of [`Classifier::classes`]
    fn predict_proba(&self, features: &[f64]) -> InferenceResult<Vec<f64>> {
        let _ = features;
        Err(ModelError::ProbabilitiesUnsupported)
    }

    /// Class identifiers in the model's internal order
    fn classes(&self) -> &[usize];

    /// Number of features the model was trained on
    fn n_features(&self) -> usize;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Short name of the estimator family (e.g. `logistic-regression`)
    fn kind(&self) -> &str;
}
