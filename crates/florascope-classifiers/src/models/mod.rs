//! Serialized model files and the estimators they describe
//!
//! A model file is JSON or YAML (chosen by extension) with an optional
//! `name`, an optional `classes` list and a `type`-tagged estimator:
//!
//! ```yaml
//! name: iris-logreg
//! type: logistic-regression
//! coefficients: [[-0.42, 0.97, -2.52, -1.08], ...]
//! intercepts: [9.85, 2.24, -12.09]
//! ```

mod centroid;
mod logistic;
mod tree;

pub use centroid::NearestCentroid;
pub use logistic::LogisticRegression;
pub use tree::{DecisionTree, TreeNode};

use crate::classifier::{Classifier, InferenceResult};
use florascope_core::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// On-disk encoding of a model file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl ModelFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some(other) => Err(ModelError::UnsupportedFormat(format!(".{}", other))),
            None => Err(ModelError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
        }
    }
}

/// Contents of a serialized model file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// Model name, defaults to the file stem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Class identifiers in estimator order, defaults to `0..n_classes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<usize>>,

    /// The estimator parameters
    #[serde(flatten)]
    pub estimator: Estimator,
}

/// Supported estimator families
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Estimator {
    /// Multinomial (or binary) logistic regression
    LogisticRegression(LogisticRegression),

    /// Single decision tree with class counts at the leaves
    DecisionTree(DecisionTree),

    /// Nearest centroid, label only
    NearestCentroid(NearestCentroid),
}

impl Estimator {
    fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic-regression",
            Self::DecisionTree(_) => "decision-tree",
            Self::NearestCentroid(_) => "nearest-centroid",
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::LogisticRegression(m) => m.validate(),
            Self::DecisionTree(m) => m.validate(),
            Self::NearestCentroid(m) => m.validate(),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            Self::LogisticRegression(m) => m.n_features(),
            Self::DecisionTree(m) => m.n_features(),
            Self::NearestCentroid(m) => m.n_features(),
        }
    }

    fn n_classes(&self) -> usize {
        match self {
            Self::LogisticRegression(m) => m.n_classes(),
            Self::DecisionTree(m) => m.n_classes(),
            Self::NearestCentroid(m) => m.n_classes(),
        }
    }

    fn supports_probabilities(&self) -> bool {
        !matches!(self, Self::NearestCentroid(_))
    }

    /// Position of the predicted class in estimator order
    fn predict_position(&self, x: &[f64]) -> usize {
        match self {
            Self::LogisticRegression(m) => argmax(&m.predict_proba(x)),
            Self::DecisionTree(m) => argmax(m.leaf_counts(x)),
            Self::NearestCentroid(m) => m.nearest(x),
        }
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Vec<f64>> {
        match self {
            Self::LogisticRegression(m) => Some(m.predict_proba(x)),
            Self::DecisionTree(m) => Some(m.predict_proba(x)),
            Self::NearestCentroid(_) => None,
        }
    }
}

impl ModelFile {
    /// Read and decode a model file, picking the format from its extension
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let format = ModelFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::decode(&contents, format)
    }

    /// Decode model file contents
    pub fn decode(contents: &str, format: ModelFormat) -> Result<Self, ModelError> {
        let file: Self = match format {
            ModelFormat::Json => serde_json::from_str(contents)?,
            ModelFormat::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(file)
    }

    /// Encode as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A validated model ready for inference
#[derive(Debug, Clone)]
pub struct LoadedModel {
    name: String,
    classes: Vec<usize>,
    estimator: Estimator,
}

impl LoadedModel {
    /// Validate a decoded model file
    ///
    /// `default_name` is used when the file carries no name.
    pub fn from_model_file(file: ModelFile, default_name: &str) -> Result<Self, ModelError> {
        file.estimator.validate()?;

        let n_classes = file.estimator.n_classes();
        let classes = match file.classes {
            Some(classes) => {
                if classes.len() != n_classes {
                    return Err(ModelError::malformed(format!(
                        "{} class identifiers for {} classes",
                        classes.len(),
                        n_classes
                    )));
                }
                let unique: HashSet<_> = classes.iter().collect();
                if unique.len() != classes.len() {
                    return Err(ModelError::malformed("duplicate class identifiers"));
                }
                classes
            }
            None => (0..n_classes).collect(),
        };

        Ok(Self {
            name: file.name.unwrap_or_else(|| default_name.to_string()),
            classes,
            estimator: file.estimator,
        })
    }

    /// Read, decode and validate a model file
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let default_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        Self::from_model_file(ModelFile::from_file(path)?, default_name)
    }

    /// Decode and validate a JSON model held in memory
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Self::from_model_file(ModelFile::decode(json, ModelFormat::Json)?, "model")
    }

    /// Get the estimator parameters
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    fn check_input(&self, x: &[f64]) -> InferenceResult<()> {
        let expected = self.estimator.n_features();
        if x.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: x.len(),
            });
        }
        if let Some(index) = x.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteFeature { index });
        }
        Ok(())
    }
}

impl Classifier for LoadedModel {
    fn predict(&self, features: &[f64]) -> InferenceResult<usize> {
        self.check_input(features)?;
        Ok(self.classes[self.estimator.predict_position(features)])
    }

    fn supports_probabilities(&self) -> bool {
        self.estimator.supports_probabilities()
    }

    fn predict_proba(&self, features: &[f64]) -> InferenceResult<Vec<f64>> {
        self.check_input(features)?;
        self.estimator
            .predict_proba(features)
            .ok_or(ModelError::ProbabilitiesUnsupported)
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.estimator.n_features()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        self.estimator.kind()
    }
}

/// Index of the first maximum; ties go to the lowest index
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Reject empty, ragged or non-finite matrices
pub(crate) fn check_matrix(rows: &[Vec<f64>], what: &str) -> Result<usize, ModelError> {
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| ModelError::malformed(format!("{} is empty", what)))?;

    if width == 0 {
        return Err(ModelError::malformed(format!("{} has zero columns", what)));
    }

    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(ModelError::malformed(format!(
                "{} row {} has {} columns, expected {}",
                what,
                i,
                row.len(),
                width
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::malformed(format!(
                "{} row {} contains a non-finite value",
                what, i
            )));
        }
    }

    Ok(width)
}
