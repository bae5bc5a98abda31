//! Life-domain components: the agent, stones, history bookkeeping.

use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The wandering agent's decision state. One per world (assumed, not
/// enforced).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Simple counter driven by energy events, not by the action loop.
    pub energy: i32,
    /// Helpers (history, sensor) are constructed lazily on the first step.
    pub first_step: bool,
    /// Actions waiting to execute, oldest first. Owned by the agent until
    /// dequeued.
    #[serde(skip)]
    pub pending: VecDeque<Entity>,
    /// How many actions one refill draws.
    pub batch: usize,
    /// History depth handed to the History helper at construction.
    pub history_depth: usize,
    /// Side length of the sensor's snapshot window, in pixels.
    pub sensor_window: u32,
}

impl Agent {
    pub fn new(energy: i32, batch: usize, history_depth: usize, sensor_window: u32) -> Self {
        Self {
            energy,
            first_step: true,
            pending: VecDeque::new(),
            batch,
            history_depth,
            sensor_window,
        }
    }
}

/// Marker for a static obstacle. Placed once at world setup; never moves;
/// may share a cell with anything.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Stone;

/// Event marker recorded when the agent's cell coincides with a stone's.
/// One marker per coinciding stone per tick.
#[derive(Debug, Clone, Copy)]
pub struct Collision {
    pub stone: Entity,
}

/// Marker for a time-frame: a container of everything recorded during one
/// tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TimeFrame;

/// Marker for the bounded history of time-frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct History {
    /// Maximum number of retained time-frames; the oldest is destroyed when
    /// an append would exceed this.
    pub depth: usize,
}
