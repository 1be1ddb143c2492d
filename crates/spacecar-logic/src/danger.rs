//! Danger rating with zone and angle weighting.
//!
//! Combines threat count, nearest-threat distance, field-of-view density,
//! front-cone threats and angular density into a single score in [0, 1],
//! then scales it by the zone multiplier and by how closely threats line up
//! with the heading.

use serde::{Deserialize, Serialize};

use crate::perception::PerceptionStats;
use crate::rounding::round3;

/// Importance of each perception feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DangerWeights {
    pub threat_count: f64,
    pub min_distance: f64,
    pub fov_density: f64,
    pub front_cone_threats: f64,
    pub angle_density: f64,
}

impl Default for DangerWeights {
    fn default() -> Self {
        Self {
            threat_count: 0.35,
            min_distance: 0.2,
            fov_density: 0.1,
            front_cone_threats: 0.2,
            angle_density: 0.15,
        }
    }
}

/// Qualitative danger band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DangerLabel {
    Low,
    Medium,
    High,
}

impl DangerLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.75 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Output of [`DangerRatingModel::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DangerRating {
    /// Score in [0, 1], rounded to three decimals.
    pub score: f64,
    pub label: DangerLabel,
}

/// Rule-based danger model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DangerRatingModel {
    pub weights: DangerWeights,
    /// Maximum boost for threats dead ahead (0° offset).
    pub max_angle_bonus: f64,
}

impl Default for DangerRatingModel {
    fn default() -> Self {
        Self {
            weights: DangerWeights::default(),
            max_angle_bonus: 0.2,
        }
    }
}

/// Distances below this are treated as this close.
const MIN_DISTANCE_FLOOR: f64 = 0.1;

impl DangerRatingModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weighted score before zone and angle scaling.
    pub fn raw_score(&self, stats: &PerceptionStats) -> f64 {
        let w = &self.weights;
        w.threat_count * (stats.threat_count as f64 / 10.0)
            + w.min_distance * (1.0 / stats.min_distance.max(MIN_DISTANCE_FLOOR))
            + w.fov_density * stats.fov_density
            + w.front_cone_threats * (stats.front_cone_threats as f64 / 10.0)
            + w.angle_density * stats.angle_weighted_density
    }

    /// Multiplier in [1, 1 + max_angle_bonus]; 1 at 90° offset or more.
    pub fn angle_multiplier(&self, avg_offset_deg: f64) -> f64 {
        1.0 + ((90.0 - avg_offset_deg.min(90.0)) / 90.0) * self.max_angle_bonus
    }

    pub fn compute(&self, stats: &PerceptionStats) -> DangerRating {
        let score = self.raw_score(stats)
            * stats.zone.multiplier()
            * self.angle_multiplier(stats.avg_threat_angle_offset);
        let score = score.clamp(0.0, 1.0);

        DangerRating {
            score: round3(score),
            label: DangerLabel::from_score(score),
        }
    }
}
