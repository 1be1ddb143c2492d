//! SpaceCar CLI
//!
//! Runs the synthetic-data stages one at a time or as a full pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Whole pipeline into ./data
//! spacecar pipeline --rows 1000 --limit 10
//!
//! # Individual stages
//! spacecar generate --rows 500 --output data/raw_features.csv
//! spacecar clean --input data/raw_features.csv --output data/cleaned_features.csv
//! spacecar label --input data/cleaned_features.csv --output data/cleaned_features_with_crash.csv
//! spacecar simulate --input data/cleaned_features_with_crash.csv --limit 25
//! spacecar analyze --input data/cleaned_features_with_crash.csv --threshold 0.8
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod commands;

/// SpaceCar command line interface
#[derive(Parser, Debug)]
#[command(name = "spacecar")]
#[command(author, version, about = "Synthetic space-car data generation and trip simulation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate raw feature rows
    Generate(GenerateArgs),

    /// Deduplicate and impute a raw dataset
    Clean(CleanArgs),

    /// Append crash labels from the grid environment
    Label(LabelArgs),

    /// Simulate trips over a cleaned dataset
    Simulate(SimulateArgs),

    /// Correlation and VIF report for numeric features
    Analyze(AnalyzeArgs),

    /// Run every stage in order
    Pipeline(PipelineArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of rows
    #[arg(short, long, default_value_t = 1000)]
    pub rows: usize,

    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    #[arg(short, long, default_value = "data/raw_features.csv")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[arg(short, long, default_value = "data/raw_features.csv")]
    pub input: PathBuf,

    #[arg(short, long, default_value = "data/cleaned_features.csv")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct LabelArgs {
    #[arg(short, long, default_value = "data/cleaned_features.csv")]
    pub input: PathBuf,

    #[arg(short, long, default_value = "data/cleaned_features_with_crash.csv")]
    pub output: PathBuf,

    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Obstacles scattered around the car for each row
    #[arg(long, default_value_t = 10)]
    pub obstacles: usize,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(short, long, default_value = "data/cleaned_features.csv")]
    pub input: PathBuf,

    #[arg(short, long, default_value = "data/simulation_results.csv")]
    pub output: PathBuf,

    /// Maximum rows to simulate
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Also write a binary snapshot of the results
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[arg(short, long, default_value = "data/cleaned_features_with_crash.csv")]
    pub input: PathBuf,

    #[arg(short, long, default_value = "data/feature_report.json")]
    pub output: PathBuf,

    /// Report pairs whose |r| exceeds this
    #[arg(short, long, default_value_t = 0.8)]
    pub threshold: f64,

    /// Columns to analyze (defaults to the perception features)
    #[arg(short, long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Regress this column on the other analyzed features
    #[arg(long)]
    pub target: Option<String>,
}

/// Flags override values from `--config`, which override the defaults.
#[derive(Args, Debug, Default)]
pub struct PipelineArgs {
    /// JSON pipeline configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long)]
    pub seed: Option<u64>,

    #[arg(short, long)]
    pub rows: Option<usize>,

    #[arg(short, long)]
    pub limit: Option<usize>,
}
