//! Florascope
//!
//! Loads a serialized classifier named in the configuration, runs one
//! prediction on the supplied measurements and prints the ranked result.

use anyhow::{Context, Result};
use clap::Parser;
use florascope_classifiers::ClassifierRegistry;
use florascope_cli::cli::{Cli, Commands};
use florascope_cli::render;
use florascope_core::FeatureVector;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let registry = ClassifierRegistry::from_file(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    match cli.command {
        Commands::Predict {
            model,
            features,
            json,
        } => predict(&registry, &model, features, json),
        Commands::Models { load } => {
            list_models(&registry, load);
            Ok(())
        }
    }
}

fn predict(
    registry: &ClassifierRegistry,
    model: &str,
    features: Option<FeatureVector>,
    json: bool,
) -> Result<()> {
    let spec = registry.config().model(model)?;

    let features = match features {
        Some(features) => features,
        None => {
            debug!(model, "Using configured default measurements");
            spec.default_features()?
        }
    };

    // Range checks belong to the input surface, not the pipeline
    spec.check_ranges(&features)?;

    let result = registry.predict(model, &features)?;
    info!(model, class = result.class, label = %result.label, "Prediction served");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::render_inputs(spec, &features));
        println!();
        print!("{}", render::render_prediction(&result));
    }

    Ok(())
}

fn list_models(registry: &ClassifierRegistry, load: bool) {
    let names = registry.config().model_names();
    if names.is_empty() {
        println!("No models configured");
        return;
    }

    for name in names {
        let Ok(spec) = registry.config().model(&name) else {
            continue;
        };

        let loaded = load.then(|| registry.classifier(&name));
        println!("{}", render::render_model(&name, spec, loaded.as_ref()));
    }
}

/// Initialize tracing/logging on stderr so stdout stays machine-readable
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("florascope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("florascope=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
