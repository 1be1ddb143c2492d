//! Integration tests chaining the models the way a trip is scored.
//!
//! Exercises: PerceptionStats → DangerRating → TrajectoryPrediction
//! → fuel → TripCost → TripEvaluation
//!
//! All tests are pure logic: no files, no ECS world.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spacecar_logic::catalog::EngineClass;
use spacecar_logic::cost::CostModel;
use spacecar_logic::danger::{DangerLabel, DangerRatingModel};
use spacecar_logic::evaluator::{TripEvaluator, TripGrade};
use spacecar_logic::fuel::{CarSpecs, FuelUsageModel};
use spacecar_logic::perception::{PerceptionStats, Zone};
use spacecar_logic::trajectory::{
    CarState, PhysicsTrajectoryModel, SmartTrajectoryModel, TorqueDirection, TurnDirection,
};

// ── Helpers ────────────────────────────────────────────────────────────

struct Scored {
    danger: f64,
    fuel: f64,
    cost: f64,
    turn: f64,
    grade: TripGrade,
    score: f64,
}

fn score_trip(car: &CarSpecs, stats: &PerceptionStats, heading: f64, previous: f64) -> Scored {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let danger = DangerRatingModel::default().compute(stats);
    let trajectory =
        SmartTrajectoryModel::default().predict(heading, stats, Some(previous), &mut rng);
    let fuel = FuelUsageModel::default()
        .estimate(car, danger.score, trajectory.turn_angle)
        .expect("valid car");
    let cost = CostModel::default().optimize(fuel).expect("non-negative fuel");
    let eval = TripEvaluator::default()
        .evaluate(danger.score, fuel, cost.total_cost, Some(trajectory.turn_angle))
        .expect("finite inputs");
    Scored {
        danger: danger.score,
        fuel,
        cost: cost.total_cost,
        turn: trajectory.turn_angle,
        grade: eval.grade,
        score: eval.score,
    }
}

fn light_car() -> CarSpecs {
    CarSpecs {
        space_weight_kg: 1200.0,
        thrust_kn: 60.0,
        power_capacity_kwh: 150.0,
        engine_class: Some(EngineClass::IonA),
        moment_of_inertia: 0.8,
    }
}

// ── Pipeline tests ─────────────────────────────────────────────────────

#[test]
fn clear_sky_light_car_is_excellent() {
    let trip = score_trip(&light_car(), &PerceptionStats::default(), 90.0, 90.0);
    assert_eq!(trip.turn, 0.0);
    assert!(trip.danger < 0.1);
    // 0.04 * 20 * 0.7 = 0.56
    assert_eq!(trip.fuel, 0.56);
    assert_eq!(trip.cost, 2.8);
    assert_eq!(trip.grade, TripGrade::Excellent);
}

#[test]
fn crowded_red_zone_is_poor() {
    let stats = PerceptionStats {
        threat_count: 8,
        min_distance: 1.0,
        fov_density: 0.9,
        front_cone_threats: 5,
        angle_weighted_density: 0.9,
        threats_left: 4,
        threats_right: 1,
        avg_threat_angle_offset: 10.0,
        zone: Zone::Red,
    };
    let heavy = CarSpecs {
        space_weight_kg: 2100.0,
        thrust_kn: 42.0,
        power_capacity_kwh: 300.0,
        engine_class: Some(EngineClass::PlasmaA),
        moment_of_inertia: 1.5,
    };
    let trip = score_trip(&heavy, &stats, 0.0, 0.0);
    assert_eq!(trip.danger, 1.0);
    assert_eq!(trip.turn, 56.0);
    // 2.0 * 1.486 * 1.3 * 1.1 * 1.5 * 1.252
    assert!((trip.fuel - 7.981).abs() < 0.005);
    assert_eq!(trip.grade, TripGrade::Poor);
    assert!(trip.score < 0.4);
}

#[test]
fn danger_raises_fuel_through_risk_multiplier() {
    let car = CarSpecs::default();
    let model = FuelUsageModel::default();
    let calm = model.estimate(&car, 0.1, 0.0).unwrap();
    let medium = model.estimate(&car, 0.5, 0.0).unwrap();
    let high = model.estimate(&car, 0.9, 0.0).unwrap();
    assert!(calm < medium && medium < high);
}

#[test]
fn danger_label_tracks_zone() {
    let base = PerceptionStats {
        threat_count: 8,
        min_distance: 1.0,
        front_cone_threats: 3,
        ..PerceptionStats::default()
    };
    let model = DangerRatingModel::default();
    let green = model.compute(&base);
    let red = model.compute(&PerceptionStats {
        zone: Zone::Red,
        ..base.clone()
    });
    assert!(red.score > green.score);
    assert_eq!(green.label, DangerLabel::Medium);
    assert_eq!(red.label, DangerLabel::High);
}

#[test]
fn smart_turn_direction_matches_physics_torque() {
    let stats = PerceptionStats::sectors(0, 4, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let smart = SmartTrajectoryModel::default().predict(45.0, &stats, None, &mut rng);

    let mut state = CarState {
        heading: 45.0,
        angular_velocity: 0.0,
    };
    let physics = PhysicsTrajectoryModel::default().predict(&mut state, &stats, 1.0);

    assert_eq!(smart.direction, TurnDirection::Left);
    assert_eq!(physics.torque_direction, TorqueDirection::Left);
}

#[test]
fn threat_flip_reverses_torque() {
    let model = PhysicsTrajectoryModel::default();
    let mut state = CarState {
        heading: 45.0,
        angular_velocity: 0.0,
    };
    let right_heavy = PerceptionStats::sectors(0, 4, 2);
    let left_heavy = PerceptionStats::sectors(4, 0, 3);

    let torques: Vec<f64> = [&right_heavy, &left_heavy, &right_heavy, &left_heavy]
        .iter()
        .map(|s| model.predict(&mut state, s, 1.0).applied_torque)
        .collect();

    assert_eq!(torques, vec![100.0, -100.0, 100.0, -100.0]);
    // Alternating torque cancels out over an even number of steps
    assert!(state.angular_velocity.abs() < 1e-12);
}
