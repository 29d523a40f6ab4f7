//! Core types for Florascope

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

/// An ordered list of numeric measurements forming one inference input
///
/// Length and order must match what the classifier was trained on. Nothing
/// here checks that; the classifier's inference call does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Create a feature vector from values
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Borrow the values
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the vector has no features
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the vector and return the values
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[f64; N]> for FeatureVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Parses comma-separated values such as `5.5,3.0,4.0,1.0`
///
/// A single trailing comma is accepted. Empty fields anywhere else are
/// rejected, since skipping them would shift every later feature one slot.
impl FromStr for FeatureVector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_suffix(',').unwrap_or(s);
        if s.trim().is_empty() {
            return Err(Error::config("no feature values given"));
        }

        s.split(',')
            .map(str::trim)
            .enumerate()
            .map(|(i, part)| {
                if part.is_empty() {
                    return Err(Error::config(format!("feature {} is empty", i + 1)));
                }
                part.parse::<f64>()
                    .map_err(|e| Error::config(format!("invalid feature value '{}': {}", part, e)))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

/// Static mapping from class index to display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabelTable(BTreeMap<usize, String>);

impl ClassLabelTable {
    /// Create an empty table; every lookup falls back to `class N`
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The three iris species in scikit-learn's class order
    pub fn iris() -> Self {
        Self::from_names(["Setosa", "Versicolor", "Virginica"])
    }

    /// Build a table where the n-th name labels class n
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).enumerate().collect())
    }

    /// Add or replace a label
    pub fn with_label(mut self, index: usize, name: impl Into<String>) -> Self {
        self.0.insert(index, name.into());
        self
    }

    /// Label for `index` if the table has one
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    /// Display label for `index`, falling back to `class N`
    pub fn label(&self, index: usize) -> Cow<'_, str> {
        match self.get(index) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("class {}", index)),
        }
    }

    /// Number of labelled classes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(index, label)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(index, name)| (*index, name.as_str()))
    }
}

impl FromIterator<(usize, String)> for ClassLabelTable {
    fn from_iter<T: IntoIterator<Item = (usize, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
