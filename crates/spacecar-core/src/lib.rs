//! SpaceCar engine
//!
//! Produces and consumes the synthetic space-car datasets. The pure models
//! live in `spacecar-logic`; this crate adds randomness, files and the ECS
//! world used for crash labeling.
//!
//! # Architecture
//!
//! ```text
//! generation ─► raw CSV ─► cleaning ─► labeling (environment) ─► simulation ─► CSV + snapshot
//!                                              └────────────► analysis ─► JSON report
//! ```
//!
//! [`pipeline::run_pipeline`] chains every stage under one data directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use spacecar_core::prelude::*;
//!
//! let config = PipelineConfig {
//!     rows: 200,
//!     ..PipelineConfig::default()
//! };
//! let summary = run_pipeline(&config)?;
//! println!("{} trips simulated", summary.simulated);
//! # Ok::<(), PipelineError>(())
//! ```

pub mod analysis;
pub mod cleaning;
pub mod components;
pub mod config;
pub mod dataset;
pub mod environment;
pub mod generation;
pub mod labeling;
pub mod persistence;
pub mod pipeline;
pub mod rng;
pub mod simulation;

pub use spacecar_logic as logic;

/// Prelude for common imports
pub mod prelude {
    pub use crate::analysis::{analyze_csv, write_report, FeatureReport, RegressionFit};
    pub use crate::cleaning::{clean_raw_data, CleaningReport};
    pub use crate::config::{ConfigError, PipelineConfig};
    pub use crate::dataset::{read_feature_rows, DatasetError, FeatureRow};
    pub use crate::environment::{CrashEnvironment, EnvironmentError};
    pub use crate::generation::RawFeatureGenerator;
    pub use crate::labeling::{generate_crash_labels, LabelSettings, LabelSummary};
    pub use crate::persistence::{load_snapshot_from_path, SaveError, SimulationSnapshot};
    pub use crate::pipeline::{run_pipeline, PipelineError, PipelineSummary};
    pub use crate::simulation::{run_simulation_from_cleaned_data, BatchSimulator, TripRecord};
}
