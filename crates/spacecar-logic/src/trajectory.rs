//! Heading prediction.
//!
//! Two models share this module:
//!
//! - [`SmartTrajectoryModel`] decides a discrete turn from threat sectors,
//!   angular density and recent momentum.
//! - [`PhysicsTrajectoryModel`] applies torque against rotational inertia
//!   and integrates angular velocity over a time step.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_heading, signed_heading_delta};
use crate::perception::PerceptionStats;

/// Which side of the car something is on, or which way it turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Turn decided by the smart model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    None,
    Left,
    Right,
}

impl From<Side> for TurnDirection {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Self::Left,
            Side::Right => Self::Right,
        }
    }
}

/// Heading change beyond which the previous step counts as momentum.
const MOMENTUM_THRESHOLD_DEG: f64 = 10.0;

/// Momentum bias from the heading change since the previous step.
pub fn momentum_bias(heading: f64, previous_heading: Option<f64>) -> Option<Side> {
    let delta = signed_heading_delta(previous_heading?, heading);
    if delta > MOMENTUM_THRESHOLD_DEG {
        Some(Side::Right)
    } else if delta < -MOMENTUM_THRESHOLD_DEG {
        Some(Side::Left)
    } else {
        None
    }
}

// ============================================================================
// SMART MODEL
// ============================================================================

/// Output of [`SmartTrajectoryModel::predict`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPrediction {
    pub current_heading: f64,
    pub predicted_heading: f64,
    pub direction: TurnDirection,
    pub adjusted_for_threats: bool,
    /// Magnitude of the heading change in degrees.
    pub turn_angle: f64,
    pub momentum_bias: Option<Side>,
    pub threats_left: u32,
    pub threats_right: u32,
    pub angle_density: f64,
    pub reason: String,
}

/// Rule-based turn selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartTrajectoryModel {
    /// Minimum turn once any threat is ahead.
    pub base_turn: f64,
    /// Extra degrees per unit of angular density.
    pub turn_amplifier: f64,
    pub max_turn_angle: f64,
}

impl Default for SmartTrajectoryModel {
    fn default() -> Self {
        Self {
            base_turn: 20.0,
            turn_amplifier: 40.0,
            max_turn_angle: 90.0,
        }
    }
}

impl SmartTrajectoryModel {
    pub fn new(base_turn: f64, turn_amplifier: f64, max_turn_angle: f64) -> Self {
        Self {
            base_turn,
            turn_amplifier,
            max_turn_angle,
        }
    }

    /// Turn magnitude for a given angular density, rounded to whole degrees.
    pub fn turn_magnitude(&self, angle_density: f64) -> f64 {
        (self.base_turn + angle_density * self.turn_amplifier)
            .round_ties_even()
            .min(self.max_turn_angle)
    }

    /// Predict the next heading.
    ///
    /// Turns away from the busier sector. On a tie the car keeps turning the
    /// way it was already turning; with no momentum either, `rng` breaks the
    /// tie.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        heading: f64,
        stats: &PerceptionStats,
        previous_heading: Option<f64>,
        rng: &mut R,
    ) -> TrajectoryPrediction {
        let bias = momentum_bias(heading, previous_heading);
        let left = stats.threats_left;
        let right = stats.threats_right;

        if stats.front_cone_threats == 0 {
            return TrajectoryPrediction {
                current_heading: heading,
                predicted_heading: heading,
                direction: TurnDirection::None,
                adjusted_for_threats: false,
                turn_angle: 0.0,
                momentum_bias: bias,
                threats_left: left,
                threats_right: right,
                angle_density: stats.angle_weighted_density,
                reason: "No threats detected".to_string(),
            };
        }

        let turn = self.turn_magnitude(stats.angle_weighted_density);

        let side = if right > left {
            Side::Left
        } else if left > right {
            Side::Right
        } else if let Some(b) = bias {
            b
        } else if rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };

        let predicted = match side {
            Side::Left => normalize_heading(heading - turn),
            Side::Right => normalize_heading(heading + turn),
        };

        let bias_text = bias.map_or_else(|| "none".to_string(), |b| b.to_string());

        TrajectoryPrediction {
            current_heading: heading,
            predicted_heading: predicted,
            direction: side.into(),
            adjusted_for_threats: true,
            turn_angle: turn,
            momentum_bias: bias,
            threats_left: left,
            threats_right: right,
            angle_density: stats.angle_weighted_density,
            reason: format!(
                "Threats ahead: adjusted based on density, sector bias, and momentum (bias={bias_text})"
            ),
        }
    }
}

// ============================================================================
// PHYSICS MODEL
// ============================================================================

/// Rotational state carried between physics steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    /// Degrees.
    pub heading: f64,
    /// Degrees per second; positive turns right.
    pub angular_velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TorqueDirection {
    None,
    Left,
    Right,
    /// Balanced sectors: torque opposes the current spin.
    MomentumBased,
}

/// Output of [`PhysicsTrajectoryModel::predict`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsPrediction {
    pub current_heading: f64,
    pub predicted_heading: f64,
    pub angular_velocity: f64,
    pub applied_torque: f64,
    pub torque_direction: TorqueDirection,
    pub angular_acceleration: f64,
    pub delta_time: f64,
}

/// Torque-driven heading integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsTrajectoryModel {
    pub moment_of_inertia: f64,
    pub max_torque: f64,
}

impl Default for PhysicsTrajectoryModel {
    fn default() -> Self {
        Self {
            moment_of_inertia: 500.0,
            max_torque: 100.0,
        }
    }
}

impl PhysicsTrajectoryModel {
    pub fn new(moment_of_inertia: f64, max_torque: f64) -> Self {
        Self {
            moment_of_inertia,
            max_torque,
        }
    }

    /// Torque and its direction for the given sectors and current spin.
    pub fn choose_torque(
        &self,
        stats: &PerceptionStats,
        angular_velocity: f64,
    ) -> (f64, TorqueDirection) {
        if stats.front_cone_threats == 0 {
            (0.0, TorqueDirection::None)
        } else if stats.threats_right > stats.threats_left {
            (self.max_torque, TorqueDirection::Left)
        } else if stats.threats_left > stats.threats_right {
            (-self.max_torque, TorqueDirection::Right)
        } else if angular_velocity.is_sign_negative() {
            (self.max_torque, TorqueDirection::MomentumBased)
        } else {
            (-self.max_torque, TorqueDirection::MomentumBased)
        }
    }

    /// Advance `state` by `delta_time` seconds and report the step.
    pub fn predict(
        &self,
        state: &mut CarState,
        stats: &PerceptionStats,
        delta_time: f64,
    ) -> PhysicsPrediction {
        let current_heading = state.heading;
        let (torque, direction) = self.choose_torque(stats, state.angular_velocity);

        let angular_acceleration = torque / self.moment_of_inertia;
        state.angular_velocity += angular_acceleration * delta_time;
        state.heading = normalize_heading(state.heading + state.angular_velocity * delta_time);

        PhysicsPrediction {
            current_heading,
            predicted_heading: state.heading,
            angular_velocity: state.angular_velocity,
            applied_torque: torque,
            torque_direction: direction,
            angular_acceleration,
            delta_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn threats(left: u32, right: u32, front: u32, density: f64) -> PerceptionStats {
        PerceptionStats {
            angle_weighted_density: density,
            ..PerceptionStats::sectors(left, right, front)
        }
    }

    #[test]
    fn test_momentum_bias() {
        assert_eq!(momentum_bias(30.0, Some(10.0)), Some(Side::Right));
        assert_eq!(momentum_bias(10.0, Some(30.0)), Some(Side::Left));
        assert_eq!(momentum_bias(5.0, Some(350.0)), Some(Side::Right));
        assert_eq!(momentum_bias(15.0, Some(10.0)), None);
        assert_eq!(momentum_bias(15.0, None), None);
    }

    #[test]
    fn test_no_threats_keeps_heading() {
        let p = SmartTrajectoryModel::default().predict(
            123.0,
            &threats(3, 1, 0, 0.9),
            None,
            &mut rng(),
        );
        assert_eq!(p.predicted_heading, 123.0);
        assert_eq!(p.direction, TurnDirection::None);
        assert!(!p.adjusted_for_threats);
        assert_eq!(p.turn_angle, 0.0);
        assert_eq!(p.reason, "No threats detected");
    }

    #[test]
    fn test_turns_away_from_busier_side() {
        let model = SmartTrajectoryModel::default();
        // 20 + 0.5 * 40 = 40°
        let p = model.predict(10.0, &threats(0, 3, 2, 0.5), None, &mut rng());
        assert_eq!(p.direction, TurnDirection::Left);
        assert_eq!(p.turn_angle, 40.0);
        assert_eq!(p.predicted_heading, 330.0);

        let p = model.predict(350.0, &threats(4, 1, 2, 0.5), None, &mut rng());
        assert_eq!(p.direction, TurnDirection::Right);
        assert_eq!(p.predicted_heading, 30.0);
        assert!(p.adjusted_for_threats);
    }

    #[test]
    fn test_tie_follows_momentum() {
        let model = SmartTrajectoryModel::default();
        let p = model.predict(100.0, &threats(2, 2, 1, 0.0), Some(60.0), &mut rng());
        assert_eq!(p.momentum_bias, Some(Side::Right));
        assert_eq!(p.direction, TurnDirection::Right);
        assert_eq!(p.predicted_heading, 120.0);
        assert!(p.reason.contains("bias=right"));
    }

    #[test]
    fn test_tie_without_momentum_is_seeded() {
        let model = SmartTrajectoryModel::default();
        let stats = threats(1, 1, 1, 0.25);
        let a = model.predict(0.0, &stats, None, &mut rng());
        let b = model.predict(0.0, &stats, None, &mut rng());
        assert_eq!(a, b);
        assert_ne!(a.direction, TurnDirection::None);
        assert!(a.reason.contains("bias=none"));
    }

    #[test]
    fn test_turn_magnitude_capped_and_rounded() {
        let model = SmartTrajectoryModel::default();
        assert_eq!(model.turn_magnitude(0.0), 20.0);
        assert_eq!(model.turn_magnitude(5.0), 90.0);

        // Half-degree turns round to even
        let fine = SmartTrajectoryModel::new(20.0, 1.0, 90.0);
        assert_eq!(fine.turn_magnitude(0.5), 20.0);
        assert_eq!(fine.turn_magnitude(1.5), 22.0);
    }

    #[test]
    fn test_physics_left_heavy_turns_right() {
        let model = PhysicsTrajectoryModel::default();
        let mut state = CarState::default();
        let stats = PerceptionStats::sectors(3, 1, 5);

        let step = model.predict(&mut state, &stats, 1.0);
        assert_eq!(step.applied_torque, -100.0);
        assert_eq!(step.torque_direction, TorqueDirection::Right);
        assert!((step.angular_acceleration + 0.2).abs() < 1e-12);
        assert!((state.angular_velocity + 0.2).abs() < 1e-12);
        assert!((state.heading - 359.8).abs() < 1e-9);

        // Acceleration accumulates over consecutive steps
        model.predict(&mut state, &stats, 1.0);
        assert!((state.angular_velocity + 0.4).abs() < 1e-12);
        assert!((state.heading - 359.4).abs() < 1e-9);
    }

    #[test]
    fn test_physics_no_threats_coasts() {
        let model = PhysicsTrajectoryModel::default();
        let mut state = CarState {
            heading: 270.0,
            angular_velocity: 15.0,
        };
        let clear = PerceptionStats::sectors(0, 0, 0);
        for _ in 0..4 {
            let step = model.predict(&mut state, &clear, 1.0);
            assert_eq!(step.applied_torque, 0.0);
            assert_eq!(step.torque_direction, TorqueDirection::None);
        }
        assert_eq!(state.angular_velocity, 15.0);
        assert_eq!(state.heading, 330.0);
    }

    #[test]
    fn test_physics_tie_opposes_spin() {
        let model = PhysicsTrajectoryModel::default();
        let tie = PerceptionStats::sectors(2, 2, 1);
        assert_eq!(
            model.choose_torque(&tie, 5.0),
            (-100.0, TorqueDirection::MomentumBased)
        );
        assert_eq!(
            model.choose_torque(&tie, -5.0),
            (100.0, TorqueDirection::MomentumBased)
        );
        assert_eq!(
            model.choose_torque(&tie, -0.0),
            (100.0, TorqueDirection::MomentumBased)
        );
        assert_eq!(
            model.choose_torque(&tie, 0.0),
            (-100.0, TorqueDirection::MomentumBased)
        );
    }

    #[test]
    fn test_physics_delta_time_scales_step() {
        let model = PhysicsTrajectoryModel::new(100.0, 50.0);
        let mut state = CarState {
            heading: 90.0,
            angular_velocity: 0.0,
        };
        let step = model.predict(&mut state, &PerceptionStats::sectors(0, 1, 1), 2.0);
        // α = 0.5, ω = 1.0, Δθ = 2.0
        assert_eq!(step.angular_velocity, 1.0);
        assert_eq!(step.predicted_heading, 92.0);
        assert_eq!(step.current_heading, 90.0);
        assert_eq!(step.delta_time, 2.0);
    }
}
