//! End-to-end run: generate, clean, label, simulate, analyze.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{analyze_csv, write_report};
use crate::cleaning::{clean_raw_data, CleaningReport};
use crate::config::{ConfigError, PipelineConfig};
use crate::dataset::{read_feature_rows, DatasetError};
use crate::generation::RawFeatureGenerator;
use crate::labeling::{generate_crash_labels, LabelError, LabelSummary};
use crate::persistence::{save_snapshot_to_path, SaveError, SimulationSnapshot};
use crate::simulation::BatchSimulator;

pub const RAW_FILE: &str = "raw_features.csv";
pub const CLEANED_FILE: &str = "cleaned_features.csv";
pub const LABELED_FILE: &str = "cleaned_features_with_crash.csv";
pub const RESULTS_FILE: &str = "simulation_results.csv";
pub const SNAPSHOT_FILE: &str = "simulation_results.bin";
pub const REPORT_FILE: &str = "feature_report.json";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Outcome of each stage and where its output went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub raw_rows: usize,
    pub cleaning: CleaningReport,
    pub labels: LabelSummary,
    pub simulated: usize,
    pub skipped: usize,
    pub high_correlation_pairs: usize,
    pub outputs: Vec<PathBuf>,
}

pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary, PipelineError> {
    config.validate()?;
    std::fs::create_dir_all(&config.data_dir).map_err(DatasetError::from)?;

    let raw = config.path(RAW_FILE);
    let cleaned = config.path(CLEANED_FILE);
    let labeled = config.path(LABELED_FILE);
    let results = config.path(RESULTS_FILE);
    let snapshot = config.path(SNAPSHOT_FILE);
    let report_path = config.path(REPORT_FILE);

    log::info!("generating {} raw rows (seed {})", config.rows, config.seed);
    RawFeatureGenerator::new(config.seed).export_to_csv(&raw, config.rows)?;

    log::info!("cleaning raw data");
    let cleaning = clean_raw_data(&raw, &cleaned)?;

    log::info!("labeling crashes");
    let labels = generate_crash_labels(&cleaned, &labeled, &config.label_settings())?;

    log::info!("simulating up to {} trips", config.limit);
    let rows = read_feature_rows(&labeled, Some(config.limit))?;
    let mut batch = BatchSimulator::new(config.limit, config.seed);
    batch.run(&rows);
    batch.save_results(&results)?;
    save_snapshot_to_path(&snapshot, &SimulationSnapshot::from_batch(&batch))?;

    log::info!("analyzing features");
    let report = analyze_csv(
        &labeled,
        None,
        config.correlation_threshold,
        Some(config.target.as_str()),
    )?;
    write_report(&report, &report_path)?;

    Ok(PipelineSummary {
        raw_rows: config.rows,
        cleaning,
        labels,
        simulated: batch.results().len(),
        skipped: batch.skipped(),
        high_correlation_pairs: report.high_correlation_pairs.len(),
        outputs: vec![raw, cleaned, labeled, results, snapshot, report_path],
    })
}
