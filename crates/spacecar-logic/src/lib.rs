//! Pure model logic for SpaceCar.
//!
//! This crate contains every model that is independent of files, ECS worlds,
//! or runtimes. Functions take plain data and return results, making them
//! unit-testable and shareable between the engine, the CLI, and the headless
//! harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Car models, car types, fuel types, engine classes, narrative tables |
//! | [`cost`] | Trip cost from fuel consumption |
//! | [`danger`] | Weighted danger score with zone and angle weighting |
//! | [`error`] | Model input errors |
//! | [`evaluator`] | Trip score and qualitative grade |
//! | [`fuel`] | Fuel usage from mass, thrust, engine class, power and risk |
//! | [`geometry`] | 2D points, heading math, forward-projection crash check |
//! | [`perception`] | Perception stats, zones, field-of-view filter |
//! | [`rounding`] | Decimal rounding helpers shared by all models |
//! | [`trajectory`] | Heading prediction: rule-based and torque-based |

pub mod catalog;
pub mod cost;
pub mod danger;
pub mod error;
pub mod evaluator;
pub mod fuel;
pub mod geometry;
pub mod perception;
pub mod rounding;
pub mod trajectory;

pub use error::ModelError;
