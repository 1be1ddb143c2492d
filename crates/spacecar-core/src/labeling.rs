//! Crash labels for cleaned datasets.
//!
//! Each row gets its own freshly built environment: a random car pose, a new
//! obstacle field and one forward-projection check. The outcome is written as
//! the `CrashOccurred` column (0 or 1).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{csv_reader, DatasetError, CRASH_COLUMN};
use crate::environment::{CrashEnvironment, EnvironmentError, COLLISION_RADIUS, FORWARD_DISTANCE};
use crate::rng::{stream_rng, Stream};

/// Environment settings used for every labeled row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSettings {
    pub seed: u64,
    pub obstacles: usize,
    pub grid_width: u32,
    pub grid_height: u32,
    pub perception_radius: f64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            seed: crate::rng::DEFAULT_SEED,
            obstacles: crate::environment::DEFAULT_OBSTACLES,
            grid_width: crate::environment::DEFAULT_GRID.0,
            grid_height: crate::environment::DEFAULT_GRID.1,
            perception_radius: crate::environment::DEFAULT_PERCEPTION_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSummary {
    pub rows: usize,
    pub crashes: usize,
}

impl LabelSummary {
    pub fn crash_rate(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.crashes as f64 / self.rows as f64
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

impl From<csv::Error> for LabelError {
    fn from(e: csv::Error) -> Self {
        Self::Dataset(e.into())
    }
}

impl From<std::io::Error> for LabelError {
    fn from(e: std::io::Error) -> Self {
        Self::Dataset(e.into())
    }
}

/// Read `input`, add or overwrite `CrashOccurred`, and write `output`.
pub fn generate_crash_labels(
    input: &Path,
    output: &Path,
    settings: &LabelSettings,
) -> Result<LabelSummary, LabelError> {
    // Validate dimensions before touching any file
    CrashEnvironment::new(
        settings.grid_width,
        settings.grid_height,
        settings.perception_radius,
    )?;

    let mut reader = csv_reader(input)?;
    let mut headers = reader.headers()?.clone();
    let crash_col = headers.iter().position(|h| h == CRASH_COLUMN);
    if crash_col.is_none() {
        headers.push_field(CRASH_COLUMN);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(&headers)?;

    let mut rng = stream_rng(settings.seed, Stream::Labeling);
    let mut summary = LabelSummary::default();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let mut env = CrashEnvironment::new(
            settings.grid_width,
            settings.grid_height,
            settings.perception_radius,
        )?;
        env.place_car(&mut rng);
        env.generate_obstacles(settings.obstacles, &mut rng)?;
        let crashed = env.check_for_crash(FORWARD_DISTANCE, COLLISION_RADIUS)?;
        let label = if crashed { "1" } else { "0" };

        let out: csv::StringRecord = match crash_col {
            Some(col) => record
                .iter()
                .enumerate()
                .map(|(j, v)| if j == col { label } else { v })
                .collect(),
            None => record.iter().chain(std::iter::once(label)).collect(),
        };
        writer.write_record(&out)?;

        summary.rows += 1;
        summary.crashes += usize::from(crashed);
        if i % 100 == 0 {
            log::info!("processed {} rows", i);
        }
    }
    writer.flush()?;

    log::info!(
        "saved labeled dataset to {} ({} crashes in {} rows)",
        output.display(),
        summary.crashes,
        summary.rows
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{read_feature_rows, write_rows};
    use crate::generation::RawFeatureGenerator;

    #[test]
    fn test_labels_appended_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clean.csv");
        let output = dir.path().join("labeled.csv");
        write_rows(&input, &RawFeatureGenerator::new(1).generate_batch(50)).unwrap();

        let summary = generate_crash_labels(&input, &output, &LabelSettings::default()).unwrap();
        assert_eq!(summary.rows, 50);

        let rows = read_feature_rows(&output, None).unwrap();
        assert_eq!(rows.len(), 50);
        assert!(rows.iter().all(|r| matches!(r.crash_occurred, Some(0) | Some(1))));
        let crashes = rows.iter().filter(|r| r.crash_occurred == Some(1)).count();
        assert_eq!(crashes, summary.crashes);
    }

    #[test]
    fn test_relabeling_replaces_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clean.csv");
        let once = dir.path().join("once.csv");
        let twice = dir.path().join("twice.csv");
        write_rows(&input, &RawFeatureGenerator::new(2).generate_batch(10)).unwrap();

        let settings = LabelSettings::default();
        generate_crash_labels(&input, &once, &settings).unwrap();
        generate_crash_labels(&once, &twice, &settings).unwrap();

        let header = |p: &Path| {
            let mut r = csv::Reader::from_path(p).unwrap();
            r.headers().unwrap().clone()
        };
        assert_eq!(header(&once), header(&twice));
        // Same seed, same labels
        assert_eq!(
            std::fs::read_to_string(&once).unwrap(),
            std::fs::read_to_string(&twice).unwrap()
        );
    }

    #[test]
    fn test_dense_field_crashes_more() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clean.csv");
        write_rows(&input, &RawFeatureGenerator::new(3).generate_batch(200)).unwrap();

        let sparse = generate_crash_labels(
            &input,
            &dir.path().join("sparse.csv"),
            &LabelSettings {
                obstacles: 1,
                ..LabelSettings::default()
            },
        )
        .unwrap();
        let dense = generate_crash_labels(
            &input,
            &dir.path().join("dense.csv"),
            &LabelSettings {
                obstacles: 60,
                ..LabelSettings::default()
            },
        )
        .unwrap();
        assert!(dense.crash_rate() > sparse.crash_rate());
    }

    #[test]
    fn test_invalid_grid_rejected_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_crash_labels(
            &dir.path().join("missing.csv"),
            &dir.path().join("out.csv"),
            &LabelSettings {
                grid_width: 10,
                ..LabelSettings::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LabelError::Environment(_)));
    }
}
