//! Prediction pipeline
//!
//! Turns a classifier handle and a feature vector into a ranked,
//! human-readable [`PredictionResult`]:
//! - label inference is called once
//! - probability inference is called once if the classifier supports it
//! - the predicted class is resolved through a [`ClassLabelTable`]
//! - the class with the highest probability is reported as the confidence,
//!   ties going to the lowest index

use crate::classifier::Classifier;
use crate::models::argmax;
use florascope_core::{ClassLabelTable, Error, FeatureVector, ModelError, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// Allowed distance between a distribution's sum and 1.0
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Runs inference and assembles prediction results
#[derive(Debug, Clone, Default)]
pub struct PredictionPipeline {
    labels: ClassLabelTable,
}

/// Probability assigned to one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    /// Class identifier
    pub class: usize,

    /// Display label
    pub label: String,

    /// Probability (0.0-1.0)
    pub probability: f64,
}

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted class identifier
    pub class: usize,

    /// Display label of the predicted class
    pub label: String,

    /// One entry per class in the classifier's order, if supported
    pub probabilities: Option<Vec<ClassProbability>>,

    /// Class holding the maximum probability
    pub confidence: Option<ClassProbability>,
}

impl PredictionPipeline {
    /// Create a pipeline rendering labels from `labels`
    pub fn new(labels: ClassLabelTable) -> Self {
        Self { labels }
    }

    /// Get the label table
    pub fn labels(&self) -> &ClassLabelTable {
        &self.labels
    }

    /// Run one prediction
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prediction`] if either inference call fails or the
    /// classifier returns something that is not a probability distribution.
    /// No partial result is ever returned.
    pub fn predict(
        &self,
        classifier: &dyn Classifier,
        features: &FeatureVector,
    ) -> Result<PredictionResult> {
        let start = Instant::now();
        let x = features.as_slice();

        let class = classifier.predict(x).map_err(Error::prediction)?;

        let probabilities = if classifier.supports_probabilities() {
            let proba = classifier.predict_proba(x).map_err(Error::prediction)?;
            check_distribution(&proba, classifier.classes().len()).map_err(Error::prediction)?;
            Some(self.label_probabilities(classifier.classes(), &proba))
        } else {
            None
        };

        let confidence = probabilities.as_ref().map(|probs| {
            let values: Vec<f64> = probs.iter().map(|p| p.probability).collect();
            probs[argmax(&values)].clone()
        });

        let result = PredictionResult {
            class,
            label: self.labels.label(class).into_owned(),
            probabilities,
            confidence,
        };

        debug!(
            model = %classifier.name(),
            class = result.class,
            label = %result.label,
            confidence = result.confidence.as_ref().map(|c| c.probability),
            latency_us = start.elapsed().as_micros() as u64,
            "Prediction complete"
        );

        Ok(result)
    }

    fn label_probabilities(&self, classes: &[usize], proba: &[f64]) -> Vec<ClassProbability> {
        classes
            .iter()
            .zip(proba)
            .map(|(&class, &probability)| ClassProbability {
                class,
                label: self.labels.label(class).into_owned(),
                probability,
            })
            .collect()
    }
}

/// Check that `proba` is a distribution over `n_classes` classes
fn check_distribution(proba: &[f64], n_classes: usize) -> std::result::Result<(), ModelError> {
    if proba.len() != n_classes {
        return Err(ModelError::invalid_distribution(format!(
            "{} probabilities for {} classes",
            proba.len(),
            n_classes
        )));
    }
    if let Some(p) = proba.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(ModelError::invalid_distribution(format!(
            "probability {} is negative or not finite",
            p
        )));
    }
    let total: f64 = proba.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ModelError::invalid_distribution(format!(
            "probabilities sum to {}",
            total
        )));
    }
    Ok(())
}

impl PredictionResult {
    /// Check if a probability distribution is present
    pub fn has_probabilities(&self) -> bool {
        self.probabilities.is_some()
    }

    /// Probabilities sorted from most to least likely, ties in class order
    pub fn ranked(&self) -> Vec<&ClassProbability> {
        let mut ranked: Vec<&ClassProbability> =
            self.probabilities.iter().flatten().collect();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        ranked
    }

    /// Probability of a class identifier, if known
    pub fn probability_of(&self, class: usize) -> Option<f64> {
        self.probabilities
            .iter()
            .flatten()
            .find(|p| p.class == class)
            .map(|p| p.probability)
    }

    /// Whether the most probable class is also the predicted one
    pub fn confidence_matches_prediction(&self) -> bool {
        self.confidence
            .as_ref()
            .map_or(false, |c| c.class == self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::InferenceResult;

    struct Fixed {
        class: usize,
        classes: Vec<usize>,
        proba: Option<Vec<f64>>,
    }

    impl Classifier for Fixed {
        fn predict(&self, _features: &[f64]) -> InferenceResult<usize> {
            Ok(self.class)
        }

        fn supports_probabilities(&self) -> bool {
            self.proba.is_some()
        }

        fn predict_proba(&self, _features: &[f64]) -> InferenceResult<Vec<f64>> {
            self.proba.clone().ok_or(ModelError::ProbabilitiesUnsupported)
        }

        fn classes(&self) -> &[usize] {
            &self.classes
        }

        fn n_features(&self) -> usize {
            4
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn kind(&self) -> &str {
            "test"
        }
    }

    fn features() -> FeatureVector {
        FeatureVector::from([5.5, 3.0, 4.0, 1.0])
    }

    #[test]
    fn test_labels_and_confidence() {
        let classifier = Fixed {
            class: 1,
            classes: vec![0, 1, 2],
            proba: Some(vec![0.1, 0.7, 0.2]),
        };
        let pipeline = PredictionPipeline::new(ClassLabelTable::iris());
        let result = pipeline.predict(&classifier, &features()).unwrap();

        assert_eq!(result.label, "Versicolor");
        let confidence = result.confidence.as_ref().unwrap();
        assert_eq!(confidence.class, 1);
        assert_eq!(confidence.probability, 0.7);
        assert!(result.confidence_matches_prediction());
        assert_eq!(result.probability_of(2), Some(0.2));
    }

    #[test]
    fn test_confidence_tie_goes_to_lowest_index() {
        let classifier = Fixed {
            class: 2,
            classes: vec![0, 1, 2],
            proba: Some(vec![0.2, 0.4, 0.4]),
        };
        let pipeline = PredictionPipeline::new(ClassLabelTable::iris());
        let result = pipeline.predict(&classifier, &features()).unwrap();

        assert_eq!(result.confidence.as_ref().unwrap().class, 1);
        assert!(!result.confidence_matches_prediction());
    }

    #[test]
    fn test_ranked_order() {
        let classifier = Fixed {
            class: 0,
            classes: vec![0, 1, 2],
            proba: Some(vec![0.25, 0.5, 0.25]),
        };
        let pipeline = PredictionPipeline::default();
        let result = pipeline.predict(&classifier, &features()).unwrap();

        let ranked: Vec<usize> = result.ranked().iter().map(|p| p.class).collect();
        assert_eq!(ranked, vec![1, 0, 2]);
        assert_eq!(result.ranked()[0].label, "class 1");
    }

    #[test]
    fn test_label_only_classifier() {
        let classifier = Fixed {
            class: 0,
            classes: vec![0, 1, 2],
            proba: None,
        };
        let pipeline = PredictionPipeline::new(ClassLabelTable::iris());
        let result = pipeline.predict(&classifier, &features()).unwrap();

        assert_eq!(result.label, "Setosa");
        assert!(!result.has_probabilities());
        assert!(result.confidence.is_none());
        assert!(result.ranked().is_empty());
        assert!(!result.confidence_matches_prediction());
    }

    #[test]
    fn test_distribution_must_sum_to_one() {
        let classifier = Fixed {
            class: 0,
            classes: vec![0, 1],
            proba: Some(vec![0.5, 0.6]),
        };
        let err = PredictionPipeline::default()
            .predict(&classifier, &features())
            .unwrap_err();
        assert!(matches!(
            err.model_error(),
            Some(ModelError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_distribution_length_must_match_classes() {
        let classifier = Fixed {
            class: 0,
            classes: vec![0, 1, 2],
            proba: Some(vec![0.5, 0.5]),
        };
        assert!(PredictionPipeline::default()
            .predict(&classifier, &features())
            .is_err());
    }

    #[test]
    fn test_negative_probability_rejected() {
        assert!(check_distribution(&[1.5, -0.5], 2).is_err());
        assert!(check_distribution(&[f64::NAN, 1.0], 2).is_err());
        assert!(check_distribution(&[0.3, 0.7], 2).is_ok());
    }
}
