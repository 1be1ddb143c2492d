//! SpaceCar Headless Scenario Harness
//!
//! Validates the trip models, the physics trajectory scenarios and the crash
//! environment in-process. Nothing is written to disk.
//!
//! Usage:
//!   cargo run -p spacecar-simtest
//!   cargo run -p spacecar-simtest -- --verbose

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use spacecar_core::environment::{CrashEnvironment, COLLISION_RADIUS, FORWARD_DISTANCE};
use spacecar_core::generation::RawFeatureGenerator;
use spacecar_core::simulation::BatchSimulator;
use spacecar_logic::cost::CostModel;
use spacecar_logic::danger::{DangerLabel, DangerRatingModel};
use spacecar_logic::evaluator::{TripEvaluator, TripGrade};
use spacecar_logic::fuel::{CarSpecs, FuelUsageModel};
use spacecar_logic::perception::{PerceptionStats, Zone};
use spacecar_logic::trajectory::{
    CarState, PhysicsPrediction, PhysicsTrajectoryModel, SmartTrajectoryModel, TorqueDirection,
    TurnDirection,
};

const EPS: f64 = 1e-9;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== SpaceCar Scenario Harness ===\n");

    let mut results = Vec::new();

    // 1. Danger rating
    results.extend(validate_danger(verbose));

    // 2. Fuel & cost
    results.extend(validate_fuel_and_cost(verbose));

    // 3. Smart trajectory
    results.extend(validate_smart_trajectory(verbose));

    // 4. Physics trajectory scenarios
    results.extend(validate_physics_scenarios(verbose));

    // 5. Trip evaluator sweep
    results.extend(validate_trip_evaluator(verbose));

    // 6. Crash environment
    results.extend(validate_crash_environment(verbose));

    // 7. Generated batch end to end
    results.extend(validate_generated_batch(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

// ── 1. Danger Rating ────────────────────────────────────────────────────

fn validate_danger(verbose: bool) -> Vec<TestResult> {
    println!("--- Danger Rating ---");
    let mut results = Vec::new();
    let model = DangerRatingModel::default();

    let clear = model.compute(&PerceptionStats::default());
    results.push(TestResult {
        name: "danger_clear_sky_low".into(),
        passed: clear.label == DangerLabel::Low && clear.score < 0.1,
        detail: format!("score={} label={:?}", clear.score, clear.label),
    });

    let crowded = PerceptionStats {
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
    let high = model.compute(&crowded);
    results.push(TestResult {
        name: "danger_crowded_red_high".into(),
        passed: high.label == DangerLabel::High && high.score == 1.0,
        detail: format!("score={} label={:?}", high.score, high.label),
    });

    // Score never decreases as threats are added
    let mut last = 0.0;
    let mut monotonic = true;
    for count in 0..=10 {
        let stats = PerceptionStats {
            threat_count: count,
            ..PerceptionStats::default()
        };
        let score = model.compute(&stats).score;
        if verbose {
            println!("  threats={:2} score={:.3}", count, score);
        }
        monotonic &= score >= last;
        last = score;
    }
    results.push(TestResult {
        name: "danger_monotonic_in_threats".into(),
        passed: monotonic,
        detail: format!("final score {:.3}", last),
    });

    // Zone ordering at fixed perception
    let base = PerceptionStats {
        threat_count: 4,
        min_distance: 2.0,
        ..PerceptionStats::default()
    };
    let by_zone: Vec<f64> = [Zone::Green, Zone::Yellow, Zone::Red]
        .iter()
        .map(|&zone| model.compute(&PerceptionStats { zone, ..base.clone() }).score)
        .collect();
    results.push(TestResult {
        name: "danger_zone_ordering".into(),
        passed: by_zone[0] < by_zone[1] && by_zone[1] < by_zone[2],
        detail: format!("green/yellow/red = {:?}", by_zone),
    });

    results
}

// ── 2. Fuel & Cost ──────────────────────────────────────────────────────

fn validate_fuel_and_cost(_verbose: bool) -> Vec<TestResult> {
    println!("--- Fuel & Cost ---");
    let mut results = Vec::new();
    let fuel = FuelUsageModel::default();
    let cost = CostModel::default();
    let car = CarSpecs::default();

    let baseline = fuel.estimate(&car, 0.0, 0.0);
    results.push(TestResult {
        name: "fuel_default_car_baseline".into(),
        // 0.04 * 2000 / 60 * 1.0 * 1.0
        passed: baseline.as_ref().is_ok_and(|f| close(*f, 1.333)),
        detail: format!("{:?}", baseline),
    });

    let levels: Vec<f64> = [0.1, 0.5, 0.9]
        .iter()
        .filter_map(|&d| fuel.estimate(&car, d, 0.0).ok())
        .collect();
    results.push(TestResult {
        name: "fuel_risk_multiplier_steps".into(),
        passed: levels.len() == 3 && levels[0] < levels[1] && levels[1] < levels[2],
        detail: format!("{:?}", levels),
    });

    let straight = fuel.estimate(&car, 0.2, 0.0).unwrap_or(f64::NAN);
    let turning = fuel.estimate(&car, 0.2, 60.0).unwrap_or(f64::NAN);
    results.push(TestResult {
        name: "fuel_turning_costs_more".into(),
        passed: turning > straight,
        detail: format!("straight={} turning={}", straight, turning),
    });

    let dead = CarSpecs {
        thrust_kn: 0.0,
        ..CarSpecs::default()
    };
    results.push(TestResult {
        name: "fuel_zero_thrust_rejected".into(),
        passed: fuel.estimate(&dead, 0.0, 0.0).is_err(),
        detail: "thrust 0 returns an error".into(),
    });

    let priced = cost.optimize(2.5);
    results.push(TestResult {
        name: "cost_flat_rate".into(),
        passed: priced
            .as_ref()
            .is_ok_and(|c| c.fuel_cost == 12.5 && c.total_cost == 12.5),
        detail: format!("{:?}", priced),
    });
    results.push(TestResult {
        name: "cost_negative_fuel_rejected".into(),
        passed: cost.optimize(-1.0).is_err(),
        detail: "negative fuel returns an error".into(),
    });

    results
}

// ── 3. Smart Trajectory ─────────────────────────────────────────────────

fn validate_smart_trajectory(verbose: bool) -> Vec<TestResult> {
    println!("--- Smart Trajectory ---");
    let mut results = Vec::new();
    let model = SmartTrajectoryModel::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let clear = model.predict(120.0, &PerceptionStats::default(), Some(120.0), &mut rng);
    results.push(TestResult {
        name: "smart_no_threats_straight".into(),
        passed: clear.direction == TurnDirection::None
            && clear.turn_angle == 0.0
            && clear.predicted_heading == 120.0,
        detail: clear.reason.clone(),
    });

    let right_busy = model.predict(10.0, &PerceptionStats::sectors(1, 4, 2), None, &mut rng);
    results.push(TestResult {
        name: "smart_turns_away_from_right".into(),
        passed: right_busy.direction == TurnDirection::Left,
        detail: format!(
            "{} -> {} ({:?})",
            right_busy.current_heading, right_busy.predicted_heading, right_busy.direction
        ),
    });

    let left_busy = model.predict(350.0, &PerceptionStats::sectors(4, 1, 2), None, &mut rng);
    results.push(TestResult {
        name: "smart_turns_away_from_left_wraps".into(),
        passed: left_busy.direction == TurnDirection::Right && left_busy.predicted_heading < 90.0,
        detail: format!("350 -> {}", left_busy.predicted_heading),
    });

    // Balanced sectors follow the momentum of the last heading change
    let tie = PerceptionStats::sectors(2, 2, 3);
    let momentum_right = model.predict(60.0, &tie, Some(30.0), &mut rng);
    let momentum_left = model.predict(30.0, &tie, Some(60.0), &mut rng);
    results.push(TestResult {
        name: "smart_tie_follows_momentum".into(),
        passed: momentum_right.direction == TurnDirection::Right
            && momentum_left.direction == TurnDirection::Left,
        detail: momentum_right.reason.clone(),
    });

    let mut max_turn: f64 = 0.0;
    for density in [0.0, 0.5, 1.0, 2.0, 5.0] {
        let stats = PerceptionStats {
            angle_weighted_density: density,
            ..PerceptionStats::sectors(0, 3, 1)
        };
        let p = model.predict(0.0, &stats, None, &mut rng);
        if verbose {
            println!("  density={:.1} turn={}", density, p.turn_angle);
        }
        max_turn = max_turn.max(p.turn_angle);
    }
    results.push(TestResult {
        name: "smart_turn_capped".into(),
        passed: max_turn <= model.max_turn_angle,
        detail: format!("max turn {} (cap {})", max_turn, model.max_turn_angle),
    });

    results
}

// ── 4. Physics Trajectory Scenarios ─────────────────────────────────────

fn run_steps(
    model: &PhysicsTrajectoryModel,
    state: &mut CarState,
    stats: &[PerceptionStats],
    verbose: bool,
) -> Vec<PhysicsPrediction> {
    stats
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let p = model.predict(state, s, 1.0);
            if verbose {
                println!(
                    "  step {}: heading {:.2} -> {:.2}, omega {:.2}, torque {} ({:?})",
                    i + 1,
                    p.current_heading,
                    p.predicted_heading,
                    p.angular_velocity,
                    p.applied_torque,
                    p.torque_direction
                );
            }
            p
        })
        .collect()
}

fn validate_physics_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Physics Trajectory ---");
    let mut results = Vec::new();
    let model = PhysicsTrajectoryModel::default();

    // Basic: left-heavy threats for five steps
    let mut state = CarState {
        heading: 0.0,
        angular_velocity: 0.0,
    };
    let steps = run_steps(
        &model,
        &mut state,
        &vec![PerceptionStats::sectors(3, 1, 5); 5],
        verbose,
    );
    results.push(TestResult {
        name: "physics_basic_left_threats".into(),
        passed: steps
            .iter()
            .all(|p| p.torque_direction == TorqueDirection::Right && p.applied_torque == -100.0)
            && close(state.angular_velocity, -1.0)
            && close(state.heading, 357.0),
        detail: format!(
            "heading {:.3}, omega {:.3}",
            state.heading, state.angular_velocity
        ),
    });

    // No threats: coasts on existing spin
    let mut state = CarState {
        heading: 90.0,
        angular_velocity: 2.0,
    };
    let steps = run_steps(
        &model,
        &mut state,
        &vec![PerceptionStats::sectors(0, 0, 0); 3],
        verbose,
    );
    results.push(TestResult {
        name: "physics_no_threats_coasts".into(),
        passed: steps.iter().all(|p| p.applied_torque == 0.0)
            && close(state.heading, 96.0)
            && close(state.angular_velocity, 2.0),
        detail: format!("heading {:.3}", state.heading),
    });

    // High momentum: large spin carries the heading round
    let mut state = CarState {
        heading: 270.0,
        angular_velocity: 15.0,
    };
    let steps = run_steps(
        &model,
        &mut state,
        &vec![PerceptionStats::sectors(0, 0, 0); 4],
        verbose,
    );
    let headings: Vec<f64> = steps.iter().map(|p| p.predicted_heading).collect();
    results.push(TestResult {
        name: "physics_high_momentum".into(),
        passed: headings
            .iter()
            .zip([285.0, 300.0, 315.0, 330.0])
            .all(|(a, b)| close(*a, b)),
        detail: format!("{:?}", headings),
    });

    // Counter torque: right-turning spin braked by left-heavy threats
    let mut state = CarState {
        heading: 180.0,
        angular_velocity: 5.0,
    };
    run_steps(
        &model,
        &mut state,
        &vec![PerceptionStats::sectors(3, 1, 3); 3],
        verbose,
    );
    results.push(TestResult {
        name: "physics_counter_torque".into(),
        passed: close(state.angular_velocity, 4.4) && close(state.heading, 193.8),
        detail: format!(
            "heading {:.3}, omega {:.3}",
            state.heading, state.angular_velocity
        ),
    });

    // Threat flip: alternating sides cancel out
    let mut state = CarState {
        heading: 45.0,
        angular_velocity: 0.0,
    };
    let right_heavy = PerceptionStats::sectors(0, 4, 2);
    let left_heavy = PerceptionStats::sectors(4, 0, 3);
    let steps = run_steps(
        &model,
        &mut state,
        &[right_heavy.clone(), left_heavy.clone(), right_heavy, left_heavy],
        verbose,
    );
    let torques: Vec<f64> = steps.iter().map(|p| p.applied_torque).collect();
    results.push(TestResult {
        name: "physics_threat_flip".into(),
        passed: torques == [100.0, -100.0, 100.0, -100.0] && state.angular_velocity.abs() < EPS,
        detail: format!("torques {:?}", torques),
    });

    // Balanced sectors oppose the current spin
    let balanced = PerceptionStats::sectors(2, 2, 2);
    let (t_pos, d_pos) = model.choose_torque(&balanced, 3.0);
    let (t_neg, _) = model.choose_torque(&balanced, -3.0);
    results.push(TestResult {
        name: "physics_balanced_opposes_spin".into(),
        passed: d_pos == TorqueDirection::MomentumBased && t_pos < 0.0 && t_neg > 0.0,
        detail: format!("omega +3 -> {}, omega -3 -> {}", t_pos, t_neg),
    });

    results
}

// ── 5. Trip Evaluator Sweep ─────────────────────────────────────────────

fn validate_trip_evaluator(verbose: bool) -> Vec<TestResult> {
    println!("--- Trip Evaluator ---");
    let mut results = Vec::new();
    let evaluator = TripEvaluator::default();

    let reference = evaluator.evaluate(0.5, 5.0, 25.0, Some(30.0));
    results.push(TestResult {
        name: "evaluator_reference_trip".into(),
        passed: reference
            .as_ref()
            .is_ok_and(|e| e.score == 0.533 && e.grade == TripGrade::Risky),
        detail: format!("{:?}", reference),
    });

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut in_range = 0;
    let mut consistent = 0;
    const TRIPS: usize = 15;
    for i in 0..TRIPS {
        let danger = rng.gen_range(0.0..1.0);
        let fuel = rng.gen_range(2.0..10.0);
        let cost = rng.gen_range(10.0..50.0);
        let turn = rng.gen_range(0.0..90.0);
        let Ok(eval) = evaluator.evaluate(danger, fuel, cost, Some(turn)) else {
            continue;
        };
        if verbose {
            println!(
                "  trip {:2}: danger={:.2} fuel={:.2} cost={:.2} turn={:.1} -> {} {:?}",
                i + 1,
                danger,
                fuel,
                cost,
                turn,
                eval.score,
                eval.grade
            );
        }
        if (0.0..=1.0).contains(&eval.score) {
            in_range += 1;
        }
        if TripGrade::from_score(eval.score) == eval.grade && eval.comment == eval.grade.comment() {
            consistent += 1;
        }
    }
    results.push(TestResult {
        name: "evaluator_scores_in_range".into(),
        passed: in_range == TRIPS,
        detail: format!("{}/{} trips in [0, 1]", in_range, TRIPS),
    });
    results.push(TestResult {
        name: "evaluator_grades_consistent".into(),
        passed: consistent == TRIPS,
        detail: format!("{}/{} grades match score bands", consistent, TRIPS),
    });

    results
}

// ── 6. Crash Environment ────────────────────────────────────────────────

fn validate_crash_environment(verbose: bool) -> Vec<TestResult> {
    println!("--- Crash Environment ---");
    let mut results = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let crash_rate = |obstacles: usize, rng: &mut ChaCha8Rng| -> f64 {
        const RUNS: usize = 500;
        let mut crashes = 0;
        for _ in 0..RUNS {
            let mut env = CrashEnvironment::default();
            env.place_car(rng);
            if env.generate_obstacles(obstacles, rng).is_err() {
                continue;
            }
            if env
                .check_for_crash(FORWARD_DISTANCE, COLLISION_RADIUS)
                .unwrap_or(false)
            {
                crashes += 1;
            }
        }
        crashes as f64 / RUNS as f64
    };

    let rates: Vec<(usize, f64)> = [0, 5, 10, 40]
        .iter()
        .map(|&n| (n, crash_rate(n, &mut rng)))
        .collect();
    if verbose {
        for (n, rate) in &rates {
            println!("  obstacles={:2} crash_rate={:.3}", n, rate);
        }
    }
    results.push(TestResult {
        name: "crash_empty_field_safe".into(),
        passed: rates[0].1 == 0.0,
        detail: format!("rate {:.3}", rates[0].1),
    });
    results.push(TestResult {
        name: "crash_rate_grows_with_obstacles".into(),
        passed: rates.windows(2).all(|w| w[1].1 >= w[0].1) && rates[3].1 > rates[1].1,
        detail: format!("{:?}", rates),
    });

    let unplaced = CrashEnvironment::default().check_for_crash(FORWARD_DISTANCE, COLLISION_RADIUS);
    results.push(TestResult {
        name: "crash_requires_car".into(),
        passed: unplaced.is_err(),
        detail: format!("{:?}", unplaced),
    });

    results
}

// ── 7. Generated Batch ──────────────────────────────────────────────────

fn validate_generated_batch(verbose: bool) -> Vec<TestResult> {
    println!("--- Generated Batch ---");
    let mut results = Vec::new();

    let rows = RawFeatureGenerator::new(42).generate_batch(200);
    let again = RawFeatureGenerator::new(42).generate_batch(200);
    results.push(TestResult {
        name: "generator_deterministic".into(),
        passed: rows == again,
        detail: format!("{} rows", rows.len()),
    });

    let mut batch = BatchSimulator::new(rows.len(), 42);
    batch.run(&rows);
    let records = batch.results();
    let scores_ok = records
        .iter()
        .all(|r| (0.0..=1.0).contains(&r.TripScore) && (0.0..=1.0).contains(&r.DangerScore));
    let mut grades = [0usize; 4];
    for r in records {
        let slot = match r.Evaluation {
            TripGrade::Excellent => 0,
            TripGrade::Good => 1,
            TripGrade::Risky => 2,
            TripGrade::Poor => 3,
        };
        grades[slot] += 1;
    }
    if verbose {
        println!(
            "  excellent={} good={} risky={} poor={}",
            grades[0], grades[1], grades[2], grades[3]
        );
    }
    results.push(TestResult {
        name: "batch_all_rows_simulated".into(),
        passed: records.len() == rows.len() && batch.skipped() == 0,
        detail: format!("{} simulated, {} skipped", records.len(), batch.skipped()),
    });
    results.push(TestResult {
        name: "batch_scores_bounded".into(),
        passed: scores_ok,
        detail: format!("grade spread {:?}", grades),
    });

    results
}
