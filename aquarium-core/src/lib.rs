//! Core aquarium simulation library: fish steering plus every other thing
//! that moves in the tank, advanced one display frame at a time.
//!
//! Main components:
//! - [`config`]: tunable parameters, loadable from TOML.
//! - [`bounds`]: the tank walls and the inner margin box.
//! - [`fish`], [`steering`], [`kinematics`]: agents and how they move.
//! - [`food`]: crumbs dropped by the user.
//! - [`bubble`], [`drift`], [`water`], [`light`], [`splash`]: ambient motion.
//! - [`phases`]: the per-frame phases, each on explicit borrows.
//! - [`simulation`]: owns the state and runs the phases in order.
//! - [`types`]: shared ids.

pub mod bounds;
pub mod bubble;
pub mod config;
pub mod drift;
pub mod error;
pub mod fish;
pub mod food;
pub mod kinematics;
pub mod light;
pub mod phases;
pub mod simulation;
pub mod splash;
pub mod steering;
pub mod types;
pub mod water;

pub use config::Config;
pub use error::ConfigError;
pub use simulation::{Simulation, SimulationState, TickReport};
