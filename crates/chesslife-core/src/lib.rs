//! Chesslife Core - Chessboard-Life Sandbox Engine
//!
//! An ECS-based artificial-life sandbox: a single agent wanders a fixed-size
//! grid dotted with stones, picking random movement actions each tick while a
//! bounded history of time-frames records everything that happened.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: the board, the agent, stones, actions, time-frames, sensors
//! - **Components**: pure data attached to entities (Spatial, Container, Agent, etc.)
//! - **Systems**: logic that queries and updates components
//!
//! On top of the raw ECS, [`world::World`] adds what the sandbox needs from its
//! runtime: registration-order iteration, name lookup, parent/child ownership,
//! and a seeded random source.
//!
//! # Example
//!
//! ```rust,no_run
//! use chesslife_core::prelude::*;
//!
//! let mut engine = Engine::new(WorldConfig::default());
//!
//! // Run simulation
//! loop {
//!     engine.tick();
//! }
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod systems;
pub mod world;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::Engine;
    pub use crate::generation::WorldConfig;
    pub use crate::world::World;
}
