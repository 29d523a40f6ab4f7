//! Named models: configuration, loader and pipeline wired together

use crate::{Classifier, ClassifierConfig, ModelLoader, PredictionPipeline, PredictionResult};
use florascope_core::{FeatureVector, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Registry resolving model names from configuration to loaded classifiers
pub struct ClassifierRegistry {
    /// Loaded classifier configuration
    config: ClassifierConfig,

    /// Loader shared with other registries, if any
    loader: Arc<ModelLoader>,
}

impl ClassifierRegistry {
    /// Create a new registry with its own loader
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_loader(config, Arc::new(ModelLoader::new()))
    }

    /// Create a registry that shares `loader`
    pub fn with_loader(config: ClassifierConfig, loader: Arc<ModelLoader>) -> Self {
        Self { config, loader }
    }

    /// Load registry from configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = ClassifierConfig::from_file(path)?;
        info!("Loaded configuration for {} models", config.models.len());
        Ok(Self::new(config))
    }

    /// Get the configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Get the loader
    pub fn loader(&self) -> &Arc<ModelLoader> {
        &self.loader
    }

    /// Load (or reuse) the classifier configured under `name`
    pub fn classifier(&self, name: &str) -> Result<Arc<dyn Classifier>> {
        let spec = self.config.model(name)?;
        self.loader.load(&spec.path)
    }

    /// Build a pipeline using the labels configured under `name`
    pub fn pipeline(&self, name: &str) -> Result<PredictionPipeline> {
        let spec = self.config.model(name)?;
        Ok(PredictionPipeline::new(spec.label_table()))
    }

    /// Load the named model and run one prediction
    pub fn predict(&self, name: &str, features: &FeatureVector) -> Result<PredictionResult> {
        let classifier = self.classifier(name)?;
        let pipeline = self.pipeline(name)?;
        pipeline.predict(classifier.as_ref(), features)
    }

    /// Load every configured model, logging the ones that fail
    ///
    /// Returns the names that loaded successfully.
    pub fn preload(&self) -> Vec<String> {
        let mut loaded = Vec::new();

        for name in self.config.model_names() {
            match self.classifier(&name) {
                Ok(_) => {
                    info!("✓ Loaded model: {}", name);
                    loaded.push(name);
                }
                Err(e) => {
                    warn!("✗ Failed to load model {}: {}", name, e);
                }
            }
        }

        info!(
            "Model registry initialized with {}/{} models",
            loaded.len(),
            self.config.models.len()
        );
        loaded
    }
}
