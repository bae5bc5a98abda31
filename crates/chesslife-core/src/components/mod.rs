//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod actions;
mod board;
mod common;
mod life;
mod sensor;

pub use actions::*;
pub use board::*;
pub use common::*;
pub use life::*;
pub use sensor::*;
