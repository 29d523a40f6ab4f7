//! Florascope Classifiers
//!
//! Loads serialized classifiers and turns their output into ranked,
//! human-readable predictions.
//!
//! - [`ModelLoader`] deserializes a model file once per path and caches the
//!   handle for the rest of the process
//! - [`PredictionPipeline`] runs label and probability inference and resolves
//!   display labels
//! - [`ClassifierRegistry`] wires both to a YAML configuration of named models

pub mod classifier;
pub mod config;
pub mod model_loader;
pub mod models;
pub mod pipeline;
pub mod registry;

pub use classifier::{Classifier, InferenceResult};
pub use config::{ClassifierConfig, FeatureSpec, ModelSpec};
pub use model_loader::ModelLoader;
pub use models::{Estimator, LoadedModel, ModelFile, ModelFormat};
pub use pipeline::{ClassProbability, PredictionPipeline, PredictionResult, PROBABILITY_TOLERANCE};
pub use registry::ClassifierRegistry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::model_loader::ModelLoader;
    pub use crate::pipeline::{PredictionPipeline, PredictionResult};
    pub use crate::registry::ClassifierRegistry;
    pub use florascope_core::{ClassLabelTable, Error, FeatureVector, Result};
}
