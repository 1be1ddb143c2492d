//! Pipeline configuration.
//!
//! Values layer as built-in defaults, then an optional JSON file, then
//! whatever the caller overrides (the CLI applies its flags last).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::environment::EDGE_MARGIN;
use crate::labeling::LabelSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory that receives every pipeline output.
    pub data_dir: PathBuf,
    pub seed: u64,
    /// Raw rows to generate.
    pub rows: usize,
    /// Rows to simulate.
    pub limit: usize,
    /// Obstacles per crash-labeling environment.
    pub obstacles: usize,
    pub grid_width: u32,
    pub grid_height: u32,
    pub perception_radius: f64,
    pub correlation_threshold: f64,
    /// Column regressed on the other analyzed features.
    pub target: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed: crate::rng::DEFAULT_SEED,
            rows: 1000,
            limit: 10,
            obstacles: crate::environment::DEFAULT_OBSTACLES,
            grid_width: crate::environment::DEFAULT_GRID.0,
            grid_height: crate::environment::DEFAULT_GRID.1,
            perception_radius: crate::environment::DEFAULT_PERCEPTION_RADIUS,
            correlation_threshold: crate::analysis::DEFAULT_CORRELATION_THRESHOLD,
            target: crate::dataset::CRASH_COLUMN.to_string(),
        }
    }
}

/// A correlation threshold must lie in (0, 1].
pub fn validate_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "correlation_threshold must be in (0, 1], got {threshold}"
        )))
    }
}

impl PipelineConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };
        if self.rows == 0 {
            return invalid("rows must be greater than zero".into());
        }
        let min = 2.0 * EDGE_MARGIN;
        if f64::from(self.grid_width) <= min || f64::from(self.grid_height) <= min {
            return invalid(format!(
                "grid {}x{} must exceed {min} on each side",
                self.grid_width, self.grid_height
            ));
        }
        if !self.perception_radius.is_finite() || self.perception_radius < 1.0 {
            return invalid(format!(
                "perception_radius must be at least 1, got {}",
                self.perception_radius
            ));
        }
        validate_threshold(self.correlation_threshold)?;
        if self.target.trim().is_empty() {
            return invalid("target column must not be empty".into());
        }
        Ok(())
    }

    pub fn label_settings(&self) -> LabelSettings {
        LabelSettings {
            seed: self.seed,
            obstacles: self.obstacles,
            grid_width: self.grid_width,
            grid_height: self.grid_height,
            perception_radius: self.perception_radius,
        }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}
