//! Logistic regression

use super::check_matrix;
use florascope_core::ModelError;
use serde::{Deserialize, Serialize};

/// Linear model with softmax (or sigmoid for a single row) output
///
/// `coefficients` has one row per class, except in the binary case where a
/// single row scores the second class against the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        check_matrix(&self.coefficients, "coefficients")?;

        if self.intercepts.len() != self.coefficients.len() {
            return Err(ModelError::malformed(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                self.coefficients.len()
            )));
        }
        if self.intercepts.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::malformed("intercepts contain a non-finite value"));
        }
        Ok(())
    }

    pub(crate) fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    pub(crate) fn n_classes(&self) -> usize {
        match self.coefficients.len() {
            1 => 2,
            n => n,
        }
    }

    fn decision_function(&self, x: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect()
    }

    pub(crate) fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let scores = self.decision_function(x);

        if let [score] = scores.as_slice() {
            let p = sigmoid(*score);
            return vec![1.0 - p, p];
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        exp.into_iter().map(|e| e / total).collect()
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
