//! Trip cost from fuel consumption.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ModelError};
use crate::rounding::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripCost {
    pub fuel_cost: f64,
    /// Equal to `fuel_cost` until other cost sources are modelled.
    pub total_cost: f64,
}

/// Flat-rate cost model: every fuel unit costs the same.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostModel {
    /// Credits per unit of fuel.
    pub fuel_unit_cost: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            fuel_unit_cost: 5.0,
        }
    }
}

impl CostModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optimize(&self, fuel_used: f64) -> Result<TripCost, ModelError> {
        let fuel_used = ensure_finite("fuel_used", fuel_used)?;
        if fuel_used < 0.0 {
            return Err(ModelError::Negative {
                field: "fuel_used",
                value: fuel_used,
            });
        }

        let fuel_cost = round_to(fuel_used * self.fuel_unit_cost, 2);
        Ok(TripCost {
            fuel_cost,
            total_cost: fuel_cost,
        })
    }
}
