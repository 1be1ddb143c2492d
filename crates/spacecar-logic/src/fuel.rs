//! Fuel usage estimation.
//!
//! Fuel scales with the mass-to-thrust ratio and is then penalised for
//! thrust away from the 60 kN sweet spot, for inefficient engine classes,
//! for oversized power plants, for dangerous surroundings and for turning.

use serde::{Deserialize, Serialize};

use crate::catalog::EngineClass;
use crate::error::{ensure_finite, ModelError};
use crate::rounding::round3;

/// Thrust at which the efficiency curve bottoms out, in kN.
pub const OPTIMAL_THRUST_KN: f64 = 60.0;

/// Physical description of a car for fuel estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarSpecs {
    /// Total mass: chassis + engine + thrusters + fuel.
    pub space_weight_kg: f64,
    pub thrust_kn: f64,
    pub power_capacity_kwh: f64,
    /// `None` for classes outside the catalog; treated as neutral efficiency.
    pub engine_class: Option<EngineClass>,
    pub moment_of_inertia: f64,
}

impl Default for CarSpecs {
    fn default() -> Self {
        Self {
            space_weight_kg: 2000.0,
            thrust_kn: OPTIMAL_THRUST_KN,
            power_capacity_kwh: 200.0,
            engine_class: Some(EngineClass::FusionB),
            moment_of_inertia: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelUsageModel {
    pub base_fuel_rate: f64,
}

impl Default for FuelUsageModel {
    fn default() -> Self {
        Self {
            base_fuel_rate: 0.04,
        }
    }
}

impl FuelUsageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quadratic penalty around [`OPTIMAL_THRUST_KN`]. Dead thrusters get a
    /// flat 2x penalty.
    pub fn thrust_efficiency_curve(&self, thrust_kn: f64) -> f64 {
        if thrust_kn <= 0.0 {
            return 2.0;
        }
        1.0 + 0.0015 * (thrust_kn - OPTIMAL_THRUST_KN).powi(2)
    }

    pub fn power_penalty(&self, power_capacity_kwh: f64) -> f64 {
        if power_capacity_kwh >= 300.0 {
            1.1
        } else {
            1.0
        }
    }

    pub fn danger_multiplier(&self, danger_score: f64) -> f64 {
        if danger_score > 0.75 {
            1.5
        } else if danger_score > 0.4 {
            1.2
        } else {
            1.0
        }
    }

    pub fn engine_factor(&self, engine_class: Option<EngineClass>) -> f64 {
        engine_class.map_or(1.0, EngineClass::fuel_efficiency)
    }

    /// Extra fuel for a turn of `turn_angle` degrees.
    pub fn turn_multiplier(&self, turn_angle: f64, moment_of_inertia: f64) -> f64 {
        if turn_angle.abs() > 0.0 {
            1.0 + 0.003 * turn_angle.abs() * moment_of_inertia
        } else {
            1.0
        }
    }

    /// Estimated fuel units for one trip, rounded to three decimals.
    pub fn estimate(
        &self,
        car: &CarSpecs,
        danger_score: f64,
        turn_angle: f64,
    ) -> Result<f64, ModelError> {
        let weight = ensure_finite("space_weight_kg", car.space_weight_kg)?;
        let thrust = ensure_finite("thrust_kn", car.thrust_kn)?;
        ensure_finite("power_capacity_kwh", car.power_capacity_kwh)?;
        ensure_finite("moment_of_inertia", car.moment_of_inertia)?;
        ensure_finite("danger_score", danger_score)?;
        ensure_finite("turn_angle", turn_angle)?;

        if thrust <= 0.0 {
            return Err(ModelError::NonPositiveThrust(thrust));
        }

        let fuel = self.base_fuel_rate
            * (weight / thrust)
            * self.thrust_efficiency_curve(thrust)
            * self.engine_factor(car.engine_class)
            * self.power_penalty(car.power_capacity_kwh)
            * self.danger_multiplier(danger_score)
            * self.turn_multiplier(turn_angle, car.moment_of_inertia);

        Ok(round3(fuel))
    }
}
