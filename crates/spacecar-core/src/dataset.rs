//! Feature datasets on disk.
//!
//! [`FeatureRow`] is the typed row shared by the generator, the crash labeler
//! and the trip simulator. Column names match the CSV headers exactly.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use spacecar_logic::catalog::EngineClass;
use spacecar_logic::fuel::CarSpecs;
use spacecar_logic::perception::{PerceptionStats, Zone};

/// Column appended by the crash labeler.
pub const CRASH_COLUMN: &str = "CrashOccurred";

/// Perception and navigation columns, in the order used for analysis.
pub const PERCEPTION_FEATURES: &[&str] = &[
    "FOV_Threat_Count",
    "Min_Distance_In_FOV",
    "FOV_Density",
    "FOV_Front_Cone_Threat_Count",
    "Angle_Weighted_Density",
    "Threats_Left_Sector",
    "Threats_Right_Sector",
    "Average_Threat_Angle_Offset",
    "heading_deg",
    "previous_heading_deg",
];

/// Errors reading or writing datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("input file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// One synthetic space-car record.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    // Vehicle
    pub car_type: String,
    pub car_model: String,
    pub engine_class: String,
    pub chassis_weight_kg: u32,
    pub moment_of_inertia: f64,
    pub engine_weight_kg: u32,
    pub thruster_weight_kg: u32,
    pub fuel_weight_kg: u32,
    pub starting_fuel_kWh: f64,
    pub fuel_type: String,
    pub energy_density_MJ_per_kg: f64,
    pub mass_density_kg_per_L: f64,
    pub total_thrust_kN: f64,
    pub thrust_rear_kN: f64,
    pub thrust_front_kN: f64,
    pub thrust_side_kN: f64,

    // Perception
    pub FOV_Threat_Count: u32,
    pub Min_Distance_In_FOV: f64,
    pub FOV_Density: f64,
    pub FOV_Front_Cone_Threat_Count: u32,
    pub Angle_Weighted_Density: f64,
    pub Threats_Left_Sector: u32,
    pub Threats_Right_Sector: u32,
    pub Average_Threat_Angle_Offset: f64,
    pub heading_deg: f64,
    pub previous_heading_deg: f64,

    // Narrative
    pub test_id: String,
    pub test_date: String,
    pub assigned_by: String,
    pub mission_type: String,
    pub crew_status: String,
    pub navigation_mode: String,
    pub origin_station: String,
    pub destination_station: String,
    pub car_color: String,
    pub last_telemetry_message: String,
    pub ship_serial_number: String,

    /// Present only in externally supplied data.
    #[serde(rename = "Zone", default, skip_serializing)]
    pub zone: Option<String>,
    /// Present once the crash labeler has run.
    #[serde(rename = "CrashOccurred", default, skip_serializing)]
    pub crash_occurred: Option<u8>,
}

impl FeatureRow {
    /// Sum of chassis, engine, thruster and fuel mass.
    pub fn space_weight_kg(&self) -> f64 {
        f64::from(self.chassis_weight_kg)
            + f64::from(self.engine_weight_kg)
            + f64::from(self.thruster_weight_kg)
            + f64::from(self.fuel_weight_kg)
    }

    pub fn perception_stats(&self) -> PerceptionStats {
        PerceptionStats {
            threat_count: self.FOV_Threat_Count,
            min_distance: self.Min_Distance_In_FOV,
            fov_density: self.FOV_Density,
            front_cone_threats: self.FOV_Front_Cone_Threat_Count,
            angle_weighted_density: self.Angle_Weighted_Density,
            threats_left: self.Threats_Left_Sector,
            threats_right: self.Threats_Right_Sector,
            avg_threat_angle_offset: self.Average_Threat_Angle_Offset,
            zone: self
                .zone
                .as_deref()
                .map(Zone::parse_lenient)
                .unwrap_or_default(),
        }
    }

    pub fn car_specs(&self) -> CarSpecs {
        CarSpecs {
            space_weight_kg: self.space_weight_kg(),
            thrust_kn: self.total_thrust_kN,
            power_capacity_kwh: self.starting_fuel_kWh,
            engine_class: EngineClass::from_name(&self.engine_class),
            moment_of_inertia: self.moment_of_inertia,
        }
    }
}

fn open_existing(path: &Path) -> Result<File, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

/// Open a CSV file for header-aware reading.
pub fn csv_reader(path: &Path) -> Result<csv::Reader<File>, DatasetError> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(open_existing(path)?))
}

/// Write any serializable rows to `path` with a header line.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read feature rows, taking at most `limit` (all when `None`).
pub fn read_feature_rows(path: &Path, limit: Option<usize>) -> Result<Vec<FeatureRow>, DatasetError> {
    let mut reader = csv_reader(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        if limit.is_some_and(|n| rows.len() >= n) {
            break;
        }
        rows.push(result?);
    }
    log::debug!("read {} feature rows from {}", rows.len(), path.display());
    Ok(rows)
}
