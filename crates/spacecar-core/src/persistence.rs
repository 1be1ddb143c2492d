//! Save/Load for simulation results
//!
//! Uses bincode for a compact binary snapshot of a finished batch run.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation::{BatchSimulator, TripRecord};

/// Version number for the snapshot format (increment when format changes)
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable result of one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Snapshot format version
    pub version: u32,
    /// Seed of the simulation stream
    pub seed: u64,
    pub rows_simulated: usize,
    pub skipped: usize,
    pub records: Vec<TripRecord>,
}

impl SimulationSnapshot {
    pub fn from_batch(batch: &BatchSimulator) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            seed: batch.seed,
            rows_simulated: batch.results().len(),
            skipped: batch.skipped(),
            records: batch.results().to_vec(),
        }
    }
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),

    #[error("Snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Save a snapshot to a writer
pub fn save_snapshot<W: Write>(writer: W, snapshot: &SimulationSnapshot) -> Result<(), SaveError> {
    bincode::serialize_into(writer, snapshot)?;
    Ok(())
}

/// Load a snapshot from a reader, rejecting other format versions
pub fn load_snapshot<R: Read>(reader: R) -> Result<SimulationSnapshot, SaveError> {
    let snapshot: SimulationSnapshot = bincode::deserialize_from(reader)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

pub fn save_snapshot_to_path(path: &Path, snapshot: &SimulationSnapshot) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    save_snapshot(&mut writer, snapshot)?;
    writer.flush()?;
    log::info!(
        "saved snapshot of {} trips to {}",
        snapshot.records.len(),
        path.display()
    );
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> Result<SimulationSnapshot, SaveError> {
    load_snapshot(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::RawFeatureGenerator;

    fn snapshot() -> SimulationSnapshot {
        let rows = RawFeatureGenerator::new(12).generate_batch(8);
        let mut batch = BatchSimulator::new(5, 12);
        batch.run(&rows);
        SimulationSnapshot::from_batch(&batch)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let original = snapshot();
        assert_eq!(original.rows_simulated, 5);

        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &original).expect("Save failed");
        let loaded = load_snapshot(&buffer[..]).expect("Load failed");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut old = snapshot();
        old.version = SNAPSHOT_VERSION + 1;
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &old).unwrap();

        match load_snapshot(&buffer[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SNAPSHOT_VERSION);
                assert_eq!(found, SNAPSHOT_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_file_is_an_error() {
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &snapshot()).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(
            load_snapshot(&buffer[..]),
            Err(SaveError::Bincode(_))
        ));
    }

    #[test]
    fn test_path_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.bin");
        let original = snapshot();
        save_snapshot_to_path(&path, &original).unwrap();
        assert_eq!(load_snapshot_from_path(&path).unwrap(), original);
    }
}
