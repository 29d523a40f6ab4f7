use clap::{Parser, Subcommand};
use florascope_core::FeatureVector;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "florascope")]
#[command(
    author,
    version,
    about = "Predict flower species from measurements with a serialized classifier"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Classifier configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "FLORASCOPE_CONFIG",
        default_value = "florascope.yaml"
    )]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one prediction and print the result
    Predict {
        /// Model name from the configuration
        #[arg(short, long, default_value = "iris")]
        model: String,

        /// Comma-separated feature values (defaults from the configuration)
        #[arg(short, long, allow_hyphen_values = true)]
        features: Option<FeatureVector>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured models
    Models {
        /// Also load each model and report its shape
        #[arg(long)]
        load: bool,
    },
}
