//! Trip evaluation: one score balancing safety, fuel, cost and turning.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ModelError};
use crate::rounding::round3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorWeights {
    pub danger: f64,
    pub fuel: f64,
    pub cost: f64,
    pub turn: f64,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            danger: 0.4,
            fuel: 0.2,
            cost: 0.2,
            turn: 0.2,
        }
    }
}

/// Values at which each penalty saturates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorNorms {
    pub fuel: f64,
    pub cost: f64,
    /// Degrees.
    pub turn: f64,
}

impl Default for EvaluatorNorms {
    fn default() -> Self {
        Self {
            fuel: 10.0,
            cost: 50.0,
            turn: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripGrade {
    Excellent,
    Good,
    Risky,
    Poor,
}

impl TripGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Excellent
        } else if score >= 0.6 {
            Self::Good
        } else if score >= 0.4 {
            Self::Risky
        } else {
            Self::Poor
        }
    }

    pub fn comment(self) -> &'static str {
        match self {
            Self::Excellent => "Efficient and low-risk path.",
            Self::Good => "Safe with minor inefficiencies.",
            Self::Risky => "Moderate danger or cost detected.",
            Self::Poor => "Unsafe or inefficient trip path.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEvaluation {
    pub score: f64,
    pub grade: TripGrade,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripEvaluator {
    pub weights: EvaluatorWeights,
    pub norms: EvaluatorNorms,
}

impl TripEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a trip; `turn_angle` of `None` counts as driving straight.
    pub fn evaluate(
        &self,
        danger_score: f64,
        fuel_used: f64,
        total_cost: f64,
        turn_angle: Option<f64>,
    ) -> Result<TripEvaluation, ModelError> {
        let danger = ensure_finite("danger_score", danger_score)?;
        let fuel = ensure_finite("fuel_used", fuel_used)?;
        let cost = ensure_finite("total_cost", total_cost)?;
        let turn = ensure_finite("turn_angle", turn_angle.unwrap_or(0.0))?;

        let fuel_norm = (fuel / self.norms.fuel).min(1.0);
        let cost_norm = (cost / self.norms.cost).min(1.0);
        let turn_norm = (turn / self.norms.turn).min(1.0);

        let w = &self.weights;
        let penalty =
            w.danger * danger + w.fuel * fuel_norm + w.cost * cost_norm + w.turn * turn_norm;

        let score = round3(1.0 - penalty);
        let grade = TripGrade::from_score(score);

        Ok(TripEvaluation {
            score,
            grade,
            comment: grade.comment().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_trip() {
        let eval = TripEvaluator::new().evaluate(0.0, 0.0, 0.0, None).unwrap();
        assert_eq!(eval.score, 1.0);
        assert_eq!(eval.grade, TripGrade::Excellent);
        assert_eq!(eval.comment, "Efficient and low-risk path.");
    }

    #[test]
    fn test_mid_trip() {
        // 0.4*0.5 + 0.2*0.5 + 0.2*0.5 + 0.2*(30/90)
        let eval = TripEvaluator::new()
            .evaluate(0.5, 5.0, 25.0, Some(30.0))
            .unwrap();
        assert_eq!(eval.score, 0.533);
        assert_eq!(eval.grade, TripGrade::Risky);
    }

    #[test]
    fn test_penalties_saturate() {
        let eval = TripEvaluator::new()
            .evaluate(1.0, 100.0, 500.0, Some(270.0))
            .unwrap();
        assert_eq!(eval.score, 0.0);
        assert_eq!(eval.grade, TripGrade::Poor);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(TripGrade::from_score(0.8), TripGrade::Excellent);
        assert_eq!(TripGrade::from_score(0.799), TripGrade::Good);
        assert_eq!(TripGrade::from_score(0.6), TripGrade::Good);
        assert_eq!(TripGrade::from_score(0.4), TripGrade::Risky);
        assert_eq!(TripGrade::from_score(0.399), TripGrade::Poor);
    }

    #[test]
    fn test_non_finite_rejected() {
        let e = TripEvaluator::new();
        assert!(e.evaluate(f64::NAN, 1.0, 1.0, None).is_err());
        assert!(e.evaluate(0.1, 1.0, 1.0, Some(f64::INFINITY)).is_err());
    }
}
