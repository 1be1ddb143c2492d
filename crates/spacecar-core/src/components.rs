//! ECS components for the crash environment.

use serde::{Deserialize, Serialize};
use spacecar_logic::geometry::Point2;

/// World-space position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Point2);

/// Heading in degrees, counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading(pub f64);

/// Marker for the controlled car.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car;

/// Marker for a static obstacle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle;
