//! Nearest centroid

use super::check_matrix;
use florascope_core::ModelError;
use serde::{Deserialize, Serialize};

/// Assigns the class whose centroid is closest in Euclidean distance
///
/// Produces labels only; there is no probability output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCentroid {
    pub centroids: Vec<Vec<f64>>,
}

impl NearestCentroid {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        check_matrix(&self.centroids, "centroids").map(|_| ())
    }

    pub(crate) fn n_features(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    pub(crate) fn n_classes(&self) -> usize {
        self.centroids.len()
    }

    /// Position of the closest centroid; ties go to the lowest index
    pub(crate) fn nearest(&self, x: &[f64]) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, centroid) in self.centroids.iter().enumerate() {
            let distance: f64 = centroid.iter().zip(x).map(|(c, v)| (c - v).powi(2)).sum();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }
}
