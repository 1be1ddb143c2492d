//! 2D geometry for the grid world: points, heading arithmetic and the
//! forward-projection collision check.
//!
//! Headings are in degrees, measured counter-clockwise from +x.

use serde::{Deserialize, Serialize};

/// Point (or offset) on the 2D grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point reached by travelling `distance` along `heading_deg`.
    pub fn project(&self, heading_deg: f64, distance: f64) -> Self {
        let rad = heading_deg.to_radians();
        Self {
            x: self.x + distance * rad.cos(),
            y: self.y + distance * rad.sin(),
        }
    }
}

/// Wrap a heading into [0, 360).
pub fn normalize_heading(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed heading change from `from` to `to`, in (-180, 180].
pub fn signed_heading_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Smallest absolute angle between `heading_deg` and the direction of the
/// offset `(dx, dy)`, in [0, 180].
pub fn angle_off_heading(dx: f64, dy: f64, heading_deg: f64) -> f64 {
    let bearing = dy.atan2(dx).to_degrees();
    let diff = (bearing - heading_deg + 360.0).rem_euclid(360.0);
    if diff <= 180.0 {
        diff
    } else {
        360.0 - diff
    }
}

/// Project `forward` units ahead of the car and report whether any obstacle
/// lies strictly within `collision_radius` of that point.
pub fn forward_collision(
    car: Point2,
    heading_deg: f64,
    obstacles: &[Point2],
    forward: f64,
    collision_radius: f64,
) -> bool {
    let ahead = car.project(heading_deg, forward);
    obstacles
        .iter()
        .any(|o| ahead.distance(o) < collision_radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(370.0), 10.0);
        assert_eq!(normalize_heading(-30.0), 330.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(0.0), 0.0);
    }

    #[test]
    fn test_signed_heading_delta_wraps() {
        assert_eq!(signed_heading_delta(350.0, 10.0), 20.0);
        assert_eq!(signed_heading_delta(10.0, 350.0), -20.0);
        assert_eq!(signed_heading_delta(0.0, 180.0), 180.0);
        assert_eq!(signed_heading_delta(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_angle_off_heading() {
        assert!((angle_off_heading(1.0, 0.0, 0.0)).abs() < 1e-9);
        assert!((angle_off_heading(0.0, 1.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((angle_off_heading(-1.0, 0.0, 0.0) - 180.0).abs() < 1e-9);
        // Behind-left when facing +y
        assert!((angle_off_heading(-1.0, -1.0, 90.0) - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_project() {
        let p = Point2::ORIGIN.project(90.0, 5.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_forward_collision() {
        let car = Point2::new(50.0, 50.0);
        // Probe lands at (55, 50)
        let hit = [Point2::new(56.0, 50.5)];
        let miss = [Point2::new(57.5, 50.0), Point2::new(45.0, 50.0)];
        assert!(forward_collision(car, 0.0, &hit, 5.0, 2.0));
        assert!(!forward_collision(car, 0.0, &miss, 5.0, 2.0));
        assert!(!forward_collision(car, 0.0, &[], 5.0, 2.0));
    }

    #[test]
    fn test_collision_radius_is_strict() {
        let car = Point2::ORIGIN;
        let edge = [Point2::new(7.0, 0.0)];
        assert!(!forward_collision(car, 0.0, &edge, 5.0, 2.0));
    }
}
