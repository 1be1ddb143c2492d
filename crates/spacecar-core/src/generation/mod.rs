//! Seeded synthetic feature rows.
//!
//! A [`RawFeatureGenerator`] owns its own `ChaCha8Rng` on the generation
//! stream, so two generators built from the same seed emit identical rows.

pub mod narrative;

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use spacecar_logic::catalog::{CarModel, EngineClass, FuelType};
use spacecar_logic::rounding::{round3, round_to};

use crate::dataset::{write_rows, DatasetError, FeatureRow};
use crate::rng::{stream_rng, Stream};

/// Default relative sensor noise.
pub const DEFAULT_NOISE: f64 = 0.03;
/// Noise applied to the integer threat counts.
pub const COUNT_NOISE: f64 = 0.05;

/// Perturb `value` by up to `noise_percent` of itself, rounded to 3 decimals.
pub fn add_sensor_noise<R: Rng + ?Sized>(value: f64, noise_percent: f64, rng: &mut R) -> f64 {
    let noise = rng.gen_range(-noise_percent..=noise_percent) * value;
    round3(value + noise)
}

fn noisy_count<R: Rng + ?Sized>(max: u32, rng: &mut R) -> u32 {
    let raw = f64::from(rng.gen_range(0..=max));
    add_sensor_noise(raw, COUNT_NOISE, rng).trunc().max(0.0) as u32
}

fn noisy_reading<R: Rng + ?Sized>(low: f64, high: f64, rng: &mut R) -> f64 {
    let raw = round_to(rng.gen_range(low..=high), 2);
    add_sensor_noise(raw, DEFAULT_NOISE, rng)
}

pub struct RawFeatureGenerator {
    rng: ChaCha8Rng,
}

impl RawFeatureGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: stream_rng(seed, Stream::Generation),
        }
    }

    pub fn generate_row(&mut self) -> FeatureRow {
        let rng = &mut self.rng;

        let model = CarModel::ALL[rng.gen_range(0..CarModel::ALL.len())].info();
        let car_type = model.car_type;
        let (engine_lo, engine_hi) = model.engine_weight_kg;
        let (thruster_lo, thruster_hi) = model.thruster_weight_kg;
        let engine_weight_kg = rng.gen_range(engine_lo..=engine_hi);
        let thruster_weight_kg = rng.gen_range(thruster_lo..=thruster_hi);

        let fuel = FuelType::ALL[rng.gen_range(0..FuelType::ALL.len())].info();
        let fuel_weight_kg = rng.gen_range(100..=300);
        let starting_fuel_kwh = round_to(rng.gen_range(100.0..=300.0), 1);

        let total_thrust = round_to(rng.gen_range(40.0..=80.0), 1);

        let engine_class = EngineClass::GENERATED
            .choose(rng)
            .copied()
            .unwrap_or(EngineClass::FusionB);

        let fov_threat_count = noisy_count(8, rng);
        let min_distance = noisy_reading(1.0, 10.0, rng);
        let fov_density = noisy_reading(0.1, 1.0, rng);
        let front_cone = noisy_count(5, rng);
        let angle_weighted_density = noisy_reading(0.0, 1.0, rng);
        let threats_left = rng.gen_range(0..=5);
        let threats_right = rng.gen_range(0..=5);
        let avg_offset = round_to(rng.gen_range(0.0..=90.0), 1);
        let heading = f64::from(rng.gen_range(0u32..=359));
        let previous_heading = f64::from(rng.gen_range(0u32..=359));

        let story = narrative::generate(rng);

        FeatureRow {
            car_type: car_type.name().to_string(),
            car_model: model.name.to_string(),
            engine_class: engine_class.name().to_string(),
            chassis_weight_kg: model.chassis_weight_kg,
            moment_of_inertia: car_type.moment_of_inertia(),
            engine_weight_kg,
            thruster_weight_kg,
            fuel_weight_kg,
            starting_fuel_kWh: starting_fuel_kwh,
            fuel_type: fuel.name.to_string(),
            energy_density_MJ_per_kg: fuel.energy_density_mj_per_kg,
            mass_density_kg_per_L: fuel.mass_density_kg_per_l,
            total_thrust_kN: total_thrust,
            thrust_rear_kN: round_to(total_thrust * 0.6, 1),
            thrust_front_kN: round_to(total_thrust * 0.3, 1),
            thrust_side_kN: round_to(total_thrust * 0.1, 1),
            FOV_Threat_Count: fov_threat_count,
            Min_Distance_In_FOV: min_distance,
            FOV_Density: fov_density,
            FOV_Front_Cone_Threat_Count: front_cone,
            Angle_Weighted_Density: angle_weighted_density,
            Threats_Left_Sector: threats_left,
            Threats_Right_Sector: threats_right,
            Average_Threat_Angle_Offset: avg_offset,
            heading_deg: heading,
            previous_heading_deg: previous_heading,
            test_id: story.test_id,
            test_date: story.test_date,
            assigned_by: story.assigned_by,
            mission_type: story.mission_type,
            crew_status: story.crew_status,
            navigation_mode: story.navigation_mode,
            origin_station: story.origin_station,
            destination_station: story.destination_station,
            car_color: story.car_color,
            last_telemetry_message: story.last_telemetry_message,
            ship_serial_number: story.ship_serial_number,
            zone: None,
            crash_occurred: None,
        }
    }

    pub fn generate_batch(&mut self, n: usize) -> Vec<FeatureRow> {
        (0..n).map(|_| self.generate_row()).collect()
    }

    /// Generate `n` rows and write them to `path` with headers.
    pub fn export_to_csv(&mut self, path: &Path, n: usize) -> Result<(), DatasetError> {
        let rows = self.generate_batch(n);
        write_rows(path, &rows)?;
        log::info!("exported {} raw records to {}", n, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use spacecar_logic::catalog::CarType;

    #[test]
    fn test_same_seed_same_rows() {
        let a = RawFeatureGenerator::new(42).generate_batch(20);
        let b = RawFeatureGenerator::new(42).generate_batch(20);
        assert_eq!(a, b);
        let c = RawFeatureGenerator::new(43).generate_batch(20);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rows_respect_catalog_ranges() {
        let mut gen = RawFeatureGenerator::new(11);
        for row in gen.generate_batch(300) {
            let model = CarModel::ALL
                .iter()
                .map(|m| m.info())
                .find(|info| info.name == row.car_model)
                .expect("known model");
            assert_eq!(row.car_type, model.car_type.name());
            assert_eq!(row.chassis_weight_kg, model.chassis_weight_kg);
            let moi = CarType::from_name(&row.car_type).unwrap().moment_of_inertia();
            assert_eq!(row.moment_of_inertia, moi);

            let (lo, hi) = model.engine_weight_kg;
            assert!((lo..=hi).contains(&row.engine_weight_kg));
            let (lo, hi) = model.thruster_weight_kg;
            assert!((lo..=hi).contains(&row.thruster_weight_kg));
            assert!((100..=300).contains(&row.fuel_weight_kg));
            assert!((100.0..=300.0).contains(&row.starting_fuel_kWh));
            assert!((40.0..=80.0).contains(&row.total_thrust_kN));

            assert!(row.FOV_Threat_Count <= 8);
            assert!(row.FOV_Front_Cone_Threat_Count <= 5);
            assert!(row.Threats_Left_Sector <= 5 && row.Threats_Right_Sector <= 5);
            assert!(row.Min_Distance_In_FOV >= 0.97 && row.Min_Distance_In_FOV <= 10.3);
            assert!((0.0..=90.0).contains(&row.Average_Threat_Angle_Offset));
            assert!((0.0..360.0).contains(&row.heading_deg));
            assert_eq!(row.heading_deg.fract(), 0.0);

            assert!(EngineClass::GENERATED
                .iter()
                .any(|e| e.name() == row.engine_class));
            assert_ne!(row.origin_station, row.destination_station);
        }
    }

    #[test]
    fn test_thrust_split() {
        let row = RawFeatureGenerator::new(2).generate_row();
        let t = row.total_thrust_kN;
        assert_eq!(row.thrust_rear_kN, round_to(t * 0.6, 1));
        assert_eq!(row.thrust_front_kN, round_to(t * 0.3, 1));
        assert_eq!(row.thrust_side_kN, round_to(t * 0.1, 1));
    }

    #[test]
    fn test_sensor_noise_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            let v = add_sensor_noise(10.0, 0.03, &mut rng);
            assert!((9.7..=10.3).contains(&v));
        }
        assert_eq!(add_sensor_noise(0.0, 0.05, &mut rng), 0.0);
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        RawFeatureGenerator::new(4).export_to_csv(&path, 12).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("car_type,car_model,engine_class,"));
        assert!(header.ends_with(",last_telemetry_message,ship_serial_number"));
        assert_eq!(header.split(',').count(), 37);
        assert_eq!(lines.count(), 12);
    }
}
