//! Plain-text rendering of predictions and model listings

use florascope_classifiers::{Classifier, ModelSpec, PredictionResult};
use florascope_core::{FeatureVector, Result};
use std::fmt::Write;
use std::sync::Arc;

/// Width of a full probability bar in characters
const BAR_WIDTH: usize = 30;

/// Percentage bar for a probability in `[0, 1]`
pub fn bar(probability: f64) -> String {
    let filled = ((probability.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Table of the submitted measurements
pub fn render_inputs(spec: &ModelSpec, features: &FeatureVector) -> String {
    let mut out = String::from("Input\n");

    for (i, value) in features.as_slice().iter().enumerate() {
        let (name, unit) = match spec.features.get(i) {
            Some(feature) => (feature.name.clone(), feature.unit.clone().unwrap_or_default()),
            None => (format!("feature {}", i + 1), String::new()),
        };
        let _ = writeln!(out, "  {:<16} {:>8.2} {}", name, value, unit);
    }

    out
}

/// Prediction summary with one bar per class
pub fn render_prediction(result: &PredictionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Prediction: {} (class {})", result.label, result.class);

    let Some(probabilities) = result.probabilities.as_ref() else {
        let _ = writeln!(out, "Probabilities: not provided by this model");
        return out;
    };

    if let Some(confidence) = &result.confidence {
        let _ = writeln!(
            out,
            "Confidence: {:.1}% ({})",
            confidence.probability * 100.0,
            confidence.label
        );
        if !result.confidence_matches_prediction() {
            let _ = writeln!(
                out,
                "Note: the most probable class ({}) differs from the predicted class ({})",
                confidence.label, result.label
            );
        }
    }

    let width = probabilities.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);
    let _ = writeln!(out, "\nClass probabilities");
    for p in probabilities {
        let _ = writeln!(
            out,
            "  {:<width$} {:>6.1}% {}",
            p.label,
            p.probability * 100.0,
            bar(p.probability),
            width = width
        );
    }

    out
}

/// One block per configured model, optionally with its loaded shape
pub fn render_model(
    name: &str,
    spec: &ModelSpec,
    loaded: Option<&Result<Arc<dyn Classifier>>>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", name);
    let _ = writeln!(out, "  path: {}", spec.path.display());
    if !spec.description.is_empty() {
        let _ = writeln!(out, "  description: {}", spec.description);
    }

    if !spec.features.is_empty() {
        let _ = writeln!(out, "  features:");
        for feature in &spec.features {
            let default = feature
                .default
                .map(|d| format!(" default {}", d))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "    {} {}{}",
                feature.name,
                feature.range_description(),
                default
            );
        }
    }

    if !spec.labels.is_empty() {
        let labels: Vec<String> = spec
            .labels
            .iter()
            .map(|(index, label)| format!("{}={}", index, label))
            .collect();
        let _ = writeln!(out, "  labels: {}", labels.join(", "));
    }

    match loaded {
        Some(Ok(model)) => {
            let _ = writeln!(
                out,
                "  model: {} ({}), {} features, {} classes, probabilities: {}",
                model.name(),
                model.kind(),
                model.n_features(),
                model.classes().len(),
                if model.supports_probabilities() { "yes" } else { "no" }
            );
        }
        Some(Err(e)) => {
            let _ = writeln!(out, "  model: unavailable ({})", e);
        }
        None => {}
    }

    out
}
