//! Grid world used to derive crash labels.
//!
//! The world holds one car entity and a ring of obstacles scattered around
//! it. A crash is a forward projection of the car landing too close to an
//! obstacle.

use hecs::{Entity, World};
use rand::Rng;
use thiserror::Error;

use spacecar_logic::geometry::{forward_collision, Point2};
use spacecar_logic::perception::{FovStats, PerceptionFilter};

use crate::components::{Car, Heading, Obstacle, Position};

/// Distance the car is kept from each grid edge.
pub const EDGE_MARGIN: f64 = 10.0;
pub const DEFAULT_GRID: (u32, u32) = (100, 100);
pub const DEFAULT_PERCEPTION_RADIUS: f64 = 20.0;
pub const DEFAULT_OBSTACLES: usize = 10;
pub const FORWARD_DISTANCE: f64 = 5.0;
pub const COLLISION_RADIUS: f64 = 2.0;

#[derive(Debug, Error, PartialEq)]
pub enum EnvironmentError {
    #[error("grid {width}x{height} leaves no room for the car (each side must exceed {min})")]
    GridTooSmall { width: u32, height: u32, min: f64 },

    #[error("perception radius must be at least 1, got {0}")]
    RadiusTooSmall(f64),

    #[error("no car has been placed")]
    NoCar,

    #[error("entity {0} vanished from the world")]
    StaleEntity(u64),
}

pub struct CrashEnvironment {
    pub world: World,
    pub grid_width: u32,
    pub grid_height: u32,
    pub perception_radius: f64,
    car: Option<Entity>,
}

impl CrashEnvironment {
    pub fn new(
        grid_width: u32,
        grid_height: u32,
        perception_radius: f64,
    ) -> Result<Self, EnvironmentError> {
        let min = 2.0 * EDGE_MARGIN;
        if f64::from(grid_width) <= min || f64::from(grid_height) <= min {
            return Err(EnvironmentError::GridTooSmall {
                width: grid_width,
                height: grid_height,
                min,
            });
        }
        if perception_radius.is_nan() || perception_radius < 1.0 {
            return Err(EnvironmentError::RadiusTooSmall(perception_radius));
        }
        Ok(Self {
            world: World::new(),
            grid_width,
            grid_height,
            perception_radius,
            car: None,
        })
    }

    /// Spawn (or respawn) the car at a random interior point and heading.
    pub fn place_car<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Entity {
        if let Some(old) = self.car.take() {
            if self.world.despawn(old).is_err() {
                log::debug!("previous car {:?} was already removed", old);
            }
        }
        let x = rng.gen_range(EDGE_MARGIN..=f64::from(self.grid_width) - EDGE_MARGIN);
        let y = rng.gen_range(EDGE_MARGIN..=f64::from(self.grid_height) - EDGE_MARGIN);
        let heading = rng.gen_range(0.0..360.0);
        let car = self
            .world
            .spawn((Car, Position(Point2::new(x, y)), Heading(heading)));
        self.car = Some(car);
        car
    }

    /// Position and heading of the placed car.
    pub fn car_pose(&self) -> Result<(Point2, f64), EnvironmentError> {
        let car = self.car.ok_or(EnvironmentError::NoCar)?;
        let mut query = self
            .world
            .query_one::<(&Position, &Heading)>(car)
            .map_err(|_| EnvironmentError::NoCar)?;
        let (pos, heading) = query.get().ok_or(EnvironmentError::NoCar)?;
        Ok((pos.0, heading.0))
    }

    /// Replace all obstacles with `count` new ones scattered around the car.
    pub fn generate_obstacles<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<(), EnvironmentError> {
        let (car, _) = self.car_pose()?;

        let old: Vec<Entity> = self
            .world
            .query::<&Obstacle>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        for entity in old {
            self.world
                .despawn(entity)
                .map_err(|_| EnvironmentError::StaleEntity(entity.to_bits().get()))?;
        }

        for _ in 0..count {
            let angle = rng.gen_range(0.0..=360.0);
            let distance = rng.gen_range(1.0..=self.perception_radius);
            self.world
                .spawn((Obstacle, Position(car.project(angle, distance))));
        }
        Ok(())
    }

    pub fn obstacle_positions(&self) -> Vec<Point2> {
        self.world
            .query::<(&Obstacle, &Position)>()
            .iter()
            .map(|(_, (_, pos))| pos.0)
            .collect()
    }

    /// Whether the point `forward` units ahead lies strictly within
    /// `collision_radius` of any obstacle.
    pub fn check_for_crash(
        &self,
        forward: f64,
        collision_radius: f64,
    ) -> Result<bool, EnvironmentError> {
        let (car, heading) = self.car_pose()?;
        Ok(forward_collision(
            car,
            heading,
            &self.obstacle_positions(),
            forward,
            collision_radius,
        ))
    }

    /// Field-of-view figures for the current obstacle layout.
    pub fn perceive(&self, filter: &PerceptionFilter) -> Result<FovStats, EnvironmentError> {
        let (car, heading) = self.car_pose()?;
        let (_, stats) = filter.filter(&self.obstacle_positions(), car, heading);
        Ok(stats)
    }
}

impl Default for CrashEnvironment {
    fn default() -> Self {
        Self {
            world: World::new(),
            grid_width: DEFAULT_GRID.0,
            grid_height: DEFAULT_GRID.1,
            perception_radius: DEFAULT_PERCEPTION_RADIUS,
            car: None,
        }
    }
}
