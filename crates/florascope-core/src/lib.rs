//! Florascope Core
//!
//! Core types and error handling shared across Florascope components.
//!
//! This crate provides:
//! - The error taxonomy for model loading and prediction
//! - Feature vectors passed to classifiers
//! - Class label tables used to render predictions

pub mod error;
pub mod types;

pub use error::{Error, ModelError, Result};
pub use types::{ClassLabelTable, FeatureVector};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ModelError, Result};
    pub use crate::types::{ClassLabelTable, FeatureVector};
}
