//! Perception: what the car's sensors report about nearby threats.
//!
//! [`PerceptionStats`] is the model-facing summary consumed by danger,
//! trajectory and fuel estimation. [`PerceptionFilter`] derives the basic
//! field-of-view figures from raw obstacle positions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{angle_off_heading, Point2};

// ============================================================================
// ZONES
// ============================================================================

/// Environmental risk band around the car.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    #[default]
    Green,
    Yellow,
    Red,
}

impl Zone {
    /// Danger score multiplier for this zone.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Green => 1.0,
            Self::Yellow => 1.25,
            Self::Red => 1.5,
        }
    }

    /// Parse a zone name case-insensitively. Unrecognised names fall back to
    /// green, which carries no extra risk.
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            other => Err(format!("unknown zone '{other}'")),
        }
    }
}

// ============================================================================
// PERCEPTION STATS
// ============================================================================

/// Sensor summary for one observation of the car's surroundings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionStats {
    /// Threats anywhere in the field of view.
    pub threat_count: u32,
    /// Distance to the nearest threat in view.
    pub min_distance: f64,
    pub fov_density: f64,
    /// Threats in the narrow cone straight ahead.
    pub front_cone_threats: u32,
    pub angle_weighted_density: f64,
    pub threats_left: u32,
    pub threats_right: u32,
    /// Mean absolute angle between heading and threats, in degrees.
    pub avg_threat_angle_offset: f64,
    pub zone: Zone,
}

impl Default for PerceptionStats {
    /// An empty sky: nothing in view, nearest threat far away, threats (if
    /// any) perpendicular to the heading.
    fn default() -> Self {
        Self {
            threat_count: 0,
            min_distance: 10.0,
            fov_density: 0.0,
            front_cone_threats: 0,
            angle_weighted_density: 0.0,
            threats_left: 0,
            threats_right: 0,
            avg_threat_angle_offset: 90.0,
            zone: Zone::Green,
        }
    }
}

impl PerceptionStats {
    /// Stats carrying only sector counts, as used by the physics model.
    pub fn sectors(left: u32, right: u32, front: u32) -> Self {
        Self {
            threats_left: left,
            threats_right: right,
            front_cone_threats: front,
            ..Self::default()
        }
    }
}

// ============================================================================
// FIELD-OF-VIEW FILTER
// ============================================================================

/// Field-of-view figures derived from raw obstacle positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FovStats {
    pub threat_count: u32,
    /// `None` when nothing is in view.
    pub min_distance: Option<f64>,
    /// `None` when nothing is in view.
    pub avg_distance: Option<f64>,
    /// Threats per unit area of the view sector.
    pub density: f64,
}

/// Selects obstacles inside a circular sector centred on the car's heading.
#[derive(Debug, Clone)]
pub struct PerceptionFilter {
    /// Full field-of-view angle in degrees.
    pub fov_deg: f64,
    pub view_radius: f64,
}

impl Default for PerceptionFilter {
    fn default() -> Self {
        Self {
            fov_deg: 120.0,
            view_radius: 50.0,
        }
    }
}

impl PerceptionFilter {
    pub fn new(fov_deg: f64, view_radius: f64) -> Self {
        Self {
            fov_deg,
            view_radius,
        }
    }

    /// Area of the view sector.
    pub fn sector_area(&self) -> f64 {
        (self.fov_deg / 360.0) * std::f64::consts::PI * self.view_radius.powi(2)
    }

    /// Whether `obstacle` is visible from `car` facing `heading_deg`.
    pub fn in_view(&self, car: Point2, heading_deg: f64, obstacle: Point2) -> bool {
        let dx = obstacle.x - car.x;
        let dy = obstacle.y - car.y;
        dx.hypot(dy) <= self.view_radius
            && angle_off_heading(dx, dy, heading_deg) <= self.fov_deg / 2.0
    }

    /// Indices of the visible obstacles together with the derived stats.
    pub fn filter(
        &self,
        obstacles: &[Point2],
        car: Point2,
        heading_deg: f64,
    ) -> (Vec<usize>, FovStats) {
        let visible: Vec<usize> = obstacles
            .iter()
            .enumerate()
            .filter(|(_, o)| self.in_view(car, heading_deg, **o))
            .map(|(i, _)| i)
            .collect();

        let distances: Vec<f64> = visible
            .iter()
            .map(|&i| car.distance(&obstacles[i]))
            .collect();

        let stats = if distances.is_empty() {
            FovStats {
                threat_count: 0,
                min_distance: None,
                avg_distance: None,
                density: 0.0,
            }
        } else {
            let count = distances.len();
            FovStats {
                threat_count: count as u32,
                min_distance: distances.iter().copied().reduce(f64::min),
                avg_distance: Some(distances.iter().sum::<f64>() / count as f64),
                density: count as f64 / self.sector_area(),
            }
        };

        (visible, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_parse() {
        assert_eq!(Zone::parse_lenient("RED"), Zone::Red);
        assert_eq!(Zone::parse_lenient(" Yellow "), Zone::Yellow);
        assert_eq!(Zone::parse_lenient("purple"), Zone::Green);
        assert!("purple".parse::<Zone>().is_err());
    }

    #[test]
    fn test_default_stats() {
        let s = PerceptionStats::default();
        assert_eq!(s.min_distance, 10.0);
        assert_eq!(s.avg_threat_angle_offset, 90.0);
        assert_eq!(s.zone, Zone::Green);
    }

    #[test]
    fn test_filter_sample_field() {
        let obstacles = [
            Point2::new(10.0, 5.0),
            Point2::new(30.0, 25.0),
            Point2::new(-15.0, 10.0),
            Point2::new(40.0, -10.0),
            Point2::new(5.0, 0.0),
        ];
        let filter = PerceptionFilter::default();
        let (visible, stats) = filter.filter(&obstacles, Point2::ORIGIN, 0.0);

        // (-15, 10) is behind the car
        assert_eq!(visible, vec![0, 1, 3, 4]);
        assert_eq!(stats.threat_count, 4);
        assert_eq!(stats.min_distance, Some(5.0));
        let expected_density = 4.0 / filter.sector_area();
        assert!((stats.density - expected_density).abs() < 1e-12);
        assert!(stats.avg_distance.is_some());
    }

    #[test]
    fn test_filter_respects_radius() {
        let filter = PerceptionFilter::new(120.0, 10.0);
        let (visible, stats) = filter.filter(&[Point2::new(11.0, 0.0)], Point2::ORIGIN, 0.0);
        assert!(visible.is_empty());
        assert_eq!(stats.min_distance, None);
        assert_eq!(stats.density, 0.0);
    }

    #[test]
    fn test_filter_half_angle() {
        let filter = PerceptionFilter::new(90.0, 50.0);
        let car = Point2::ORIGIN;
        assert!(filter.in_view(car, 0.0, Point2::new(10.0, 9.9)));
        assert!(!filter.in_view(car, 0.0, Point2::new(10.0, 10.5)));
        assert!(filter.in_view(car, 90.0, Point2::new(0.0, 20.0)));
    }
}
