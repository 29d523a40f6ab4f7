//! Error types for Florascope

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result type alias using Florascope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Florascope operations
///
/// Errors are `Clone` because a failed model load is cached and handed to
/// every later caller asking for the same path.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The model path does not exist
    #[error("model file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The model file exists but could not be turned into a classifier
    #[error("failed to load model {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Arc<ModelError>,
    },

    /// Inference raised for a single request
    #[error("prediction failed: {source}")]
    Prediction {
        #[source]
        source: Arc<ModelError>,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a not-found error for a model path
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Wrap a model error raised while loading `path`
    pub fn load(path: impl AsRef<Path>, source: impl Into<ModelError>) -> Self {
        Self::Load {
            path: path.as_ref().to_path_buf(),
            source: Arc::new(source.into()),
        }
    }

    /// Wrap a model error raised during inference
    pub fn prediction(source: impl Into<ModelError>) -> Self {
        Self::Prediction {
            source: Arc::new(source.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The underlying model error, if any
    pub fn model_error(&self) -> Option<&ModelError> {
        match self {
            Self::Load { source, .. } | Self::Prediction { source } => Some(source),
            Self::NotFound { .. } | Self::Config(_) => None,
        }
    }
}

/// Causes raised by model files and classifier implementations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Feature vector length differs from what the model was trained on
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A feature value was NaN or infinite
    #[error("feature {index} is not a finite number")]
    NonFiniteFeature { index: usize },

    /// The model produced something that is not a probability distribution
    #[error("invalid probability distribution: {0}")]
    InvalidDistribution(String),

    /// The model file decoded but its parameters are inconsistent
    #[error("malformed model: {0}")]
    Malformed(String),

    /// The classifier has no probability-distribution operation
    #[error("classifier does not provide class probabilities")]
    ProbabilitiesUnsupported,

    /// The file extension does not name a known model format
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// Reading the model file failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding failed
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ModelError {
    /// Create a malformed-model error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create an invalid-distribution error
    pub fn invalid_distribution(msg: impl Into<String>) -> Self {
        Self::InvalidDistribution(msg.into())
    }
}
