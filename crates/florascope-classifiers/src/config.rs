//! Configuration for models, their feature schema and class labels

use florascope_core::{ClassLabelTable, Error, FeatureVector, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for all models
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Model configurations by name
    #[serde(default)]
    pub models: BTreeMap<String, ModelSpec>,
}

/// Configuration for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Path to the serialized model file
    pub path: PathBuf,

    /// Model description
    #[serde(default)]
    pub description: String,

    /// Input features in the order the model expects them
    #[serde(default)]
    pub features: Vec<FeatureSpec>,

    /// Display names by class index
    #[serde(default)]
    pub labels: ClassLabelTable,
}

/// One input feature as presented to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Feature name
    pub name: String,

    /// Unit shown next to the value (e.g. `cm`)
    #[serde(default)]
    pub unit: Option<String>,

    /// Smallest accepted value
    #[serde(default)]
    pub min: Option<f64>,

    /// Largest accepted value
    #[serde(default)]
    pub max: Option<f64>,

    /// Initial value when the user supplies none
    #[serde(default)]
    pub default: Option<f64>,
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("invalid classifier config: {}", e)))
    }

    /// Load from file
    ///
    /// Relative model paths are resolved against the directory holding the
    /// configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Prefix every relative model path with `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for spec in self.models.values_mut() {
            if spec.path.is_relative() {
                spec.path = base.join(&spec.path);
            }
        }
    }

    /// Get a model configuration by name
    pub fn model(&self, name: &str) -> Result<&ModelSpec> {
        self.models
            .get(name)
            .ok_or_else(|| Error::config(format!("model '{}' not found", name)))
    }

    /// Get all model names, sorted
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }
}

impl ModelSpec {
    /// Create a spec for a model file with no feature schema or labels
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            description: String::new(),
            features: Vec::new(),
            labels: ClassLabelTable::new(),
        }
    }

    /// Set the label table
    pub fn with_labels(mut self, labels: ClassLabelTable) -> Self {
        self.labels = labels;
        self
    }

    /// Add a feature
    pub fn with_feature(mut self, feature: FeatureSpec) -> Self {
        self.features.push(feature);
        self
    }

    /// Class label table for rendering predictions
    pub fn label_table(&self) -> ClassLabelTable {
        self.labels.clone()
    }

    /// Feature vector made of every feature's default value
    pub fn default_features(&self) -> Result<FeatureVector> {
        if self.features.is_empty() {
            return Err(Error::config("no features configured"));
        }

        self.features
            .iter()
            .map(|f| {
                f.default.ok_or_else(|| {
                    Error::config(format!("feature '{}' has no default value", f.name))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(FeatureVector::new)
    }

    /// Check each supplied value against its feature's range
    ///
    /// Only positions that have a configured feature are checked; the vector
    /// length is left for the classifier to judge.
    pub fn check_ranges(&self, features: &FeatureVector) -> Result<()> {
        for (spec, value) in self.features.iter().zip(features.as_slice()) {
            if !spec.contains(*value) {
                return Err(Error::config(format!(
                    "{} = {} is outside {}",
                    spec.name,
                    value,
                    spec.range_description()
                )));
            }
        }
        Ok(())
    }
}

impl FeatureSpec {
    /// Create a feature with no range or default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            min: None,
            max: None,
            default: None,
        }
    }

    /// Set the accepted range
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }

    /// Check if `value` lies within the configured bounds
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// Human-readable range, e.g. `[4, 8]`
    pub fn range_description(&self) -> String {
        let bound = |b: Option<f64>, open: &str| b.map_or_else(|| open.to_string(), |v| v.to_string());
        format!("[{}, {}]", bound(self.min, "-inf"), bound(self.max, "inf"))
    }
}
