//! Trip simulation over cleaned feature rows.
//!
//! Each row flows through danger → trajectory → fuel → cost → evaluation.
//! The turn angle chosen by the trajectory model feeds both the fuel
//! estimate and the trip score.

use std::path::Path;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use spacecar_logic::cost::CostModel;
use spacecar_logic::danger::{DangerLabel, DangerRatingModel};
use spacecar_logic::evaluator::{TripEvaluator, TripGrade};
use spacecar_logic::fuel::FuelUsageModel;
use spacecar_logic::trajectory::{Side, SmartTrajectoryModel, TurnDirection};
use spacecar_logic::ModelError;

use crate::dataset::{read_feature_rows, write_rows, DatasetError, FeatureRow};
use crate::rng::{stream_rng, Stream};

/// One simulated trip, flattened for CSV output.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub test_id: String,
    pub car_model: String,
    pub car_type: String,
    pub engine_class: String,
    pub moment_of_inertia: f64,
    pub space_weight_kg: f64,
    pub total_thrust_kN: f64,
    pub starting_fuel_kWh: f64,
    pub assigned_by: String,
    pub origin_station: String,
    pub destination_station: String,
    pub last_telemetry_message: String,

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

    pub DangerScore: f64,
    pub DangerLabel: DangerLabel,
    pub FuelUsed: f64,
    pub fuel_cost: f64,
    pub total_cost: f64,

    pub CurrentHeading: f64,
    pub PredictedHeading: f64,
    pub TurnDirection: TurnDirection,
    pub TurnAngle: f64,
    pub AdjustedForThreats: bool,
    pub MomentumBias: Option<Side>,
    pub Reason: String,

    pub TripScore: f64,
    pub Evaluation: TripGrade,
    pub Comments: String,

    pub CrashOccurred: Option<u8>,
}

/// The model chain applied to every trip.
#[derive(Debug, Clone, Default)]
pub struct TripSimulator {
    pub danger: DangerRatingModel,
    pub trajectory: SmartTrajectoryModel,
    pub fuel: FuelUsageModel,
    pub cost: CostModel,
    pub evaluator: TripEvaluator,
}

impl TripSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one row through the model chain.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        row: &FeatureRow,
        rng: &mut R,
    ) -> Result<TripRecord, ModelError> {
        let stats = row.perception_stats();
        let car = row.car_specs();

        let danger = self.danger.compute(&stats);
        let trajectory = self.trajectory.predict(
            row.heading_deg,
            &stats,
            Some(row.previous_heading_deg),
            rng,
        );
        let fuel_used = self
            .fuel
            .estimate(&car, danger.score, trajectory.turn_angle)?;
        let cost = self.cost.optimize(fuel_used)?;
        let eval = self.evaluator.evaluate(
            danger.score,
            fuel_used,
            cost.total_cost,
            Some(trajectory.turn_angle),
        )?;

        Ok(TripRecord {
            test_id: row.test_id.clone(),
            car_model: row.car_model.clone(),
            car_type: row.car_type.clone(),
            engine_class: row.engine_class.clone(),
            moment_of_inertia: row.moment_of_inertia,
            space_weight_kg: car.space_weight_kg,
            total_thrust_kN: row.total_thrust_kN,
            starting_fuel_kWh: row.starting_fuel_kWh,
            assigned_by: row.assigned_by.clone(),
            origin_station: row.origin_station.clone(),
            destination_station: row.destination_station.clone(),
            last_telemetry_message: row.last_telemetry_message.clone(),
            FOV_Threat_Count: row.FOV_Threat_Count,
            Min_Distance_In_FOV: row.Min_Distance_In_FOV,
            FOV_Density: row.FOV_Density,
            FOV_Front_Cone_Threat_Count: row.FOV_Front_Cone_Threat_Count,
            Angle_Weighted_Density: row.Angle_Weighted_Density,
            Threats_Left_Sector: row.Threats_Left_Sector,
            Threats_Right_Sector: row.Threats_Right_Sector,
            Average_Threat_Angle_Offset: row.Average_Threat_Angle_Offset,
            heading_deg: row.heading_deg,
            previous_heading_deg: row.previous_heading_deg,
            DangerScore: danger.score,
            DangerLabel: danger.label,
            FuelUsed: fuel_used,
            fuel_cost: cost.fuel_cost,
            total_cost: cost.total_cost,
            CurrentHeading: trajectory.current_heading,
            PredictedHeading: trajectory.predicted_heading,
            TurnDirection: trajectory.direction,
            TurnAngle: trajectory.turn_angle,
            AdjustedForThreats: trajectory.adjusted_for_threats,
            MomentumBias: trajectory.momentum_bias,
            Reason: trajectory.reason,
            TripScore: eval.score,
            Evaluation: eval.grade,
            Comments: eval.comment,
            CrashOccurred: row.crash_occurred,
        })
    }
}

/// Simulates up to `limit` rows and collects the results.
pub struct BatchSimulator {
    pub limit: usize,
    pub seed: u64,
    simulator: TripSimulator,
    rng: ChaCha8Rng,
    results: Vec<TripRecord>,
    skipped: usize,
}

impl BatchSimulator {
    pub fn new(limit: usize, seed: u64) -> Self {
        Self {
            limit,
            seed,
            simulator: TripSimulator::new(),
            rng: stream_rng(seed, Stream::Simulation),
            results: Vec::new(),
            skipped: 0,
        }
    }

    pub fn with_simulator(mut self, simulator: TripSimulator) -> Self {
        self.simulator = simulator;
        self
    }

    /// Simulate the first `limit` rows. Rows the models reject are skipped.
    ///
    /// Each call replaces the results and skip count of the previous one;
    /// the random stream carries on where it left off.
    pub fn run(&mut self, rows: &[FeatureRow]) -> &[TripRecord] {
        self.results.clear();
        self.skipped = 0;
        for row in rows.iter().take(self.limit) {
            match self.simulator.simulate(row, &mut self.rng) {
                Ok(record) => {
                    log::debug!(
                        "{}: danger {} fuel {} grade {:?}",
                        record.test_id,
                        record.DangerScore,
                        record.FuelUsed,
                        record.Evaluation
                    );
                    self.results.push(record);
                }
                Err(e) => {
                    log::warn!("skipping {}: {}", row.test_id, e);
                    self.skipped += 1;
                }
            }
        }
        log::info!(
            "simulated {} trips ({} skipped)",
            self.results.len(),
            self.skipped
        );
        &self.results
    }

    pub fn run_from_csv(&mut self, path: &Path) -> Result<&[TripRecord], DatasetError> {
        let rows = read_feature_rows(path, Some(self.limit))?;
        Ok(self.run(&rows))
    }

    pub fn results(&self) -> &[TripRecord] {
        &self.results
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_results(self) -> Vec<TripRecord> {
        self.results
    }

    pub fn save_results(&self, path: &Path) -> Result<(), DatasetError> {
        write_rows(path, &self.results)?;
        log::info!("results saved to {}", path.display());
        Ok(())
    }
}

/// Simulate the first `limit` rows of a cleaned dataset.
pub fn run_simulation_from_cleaned_data(
    path: &Path,
    limit: usize,
    seed: u64,
) -> Result<Vec<TripRecord>, DatasetError> {
    let mut batch = BatchSimulator::new(limit, seed);
    batch.run_from_csv(path)?;
    Ok(batch.into_results())
}
