//! Common components used across multiple entity types.

use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 3D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Spatial position component - where an entity sits in the world.
///
/// Positions are stored as floats but stand for integer grid cells; grid
/// reads truncate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Spatial {
    pub position: Vec3,
}

impl Spatial {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec3::new(x, y, 0.0),
        }
    }

    /// The grid cell this position falls in.
    pub fn grid(&self) -> (i32, i32) {
        (self.position.x as i32, self.position.y as i32)
    }
}

/// Name component for entities that have names. Names are not unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Back-link to the owning entity.
#[derive(Debug, Clone, Copy)]
pub struct Parent(pub Entity);

/// Entities owned by this one; destroyed along with it.
#[derive(Debug, Clone, Default)]
pub struct Children(pub Vec<Entity>);

/// An ordered sequence of owned entities - the building block for
/// time-frames and history.
#[derive(Debug, Clone, Default)]
pub struct Container {
    items: VecDeque<Entity>,
}

impl Container {
    /// Append an item, preserving insertion order.
    pub fn push(&mut self, item: Entity) {
        self.items.push_back(item);
    }

    /// Remove and return the oldest item.
    pub fn pop_front(&mut self) -> Option<Entity> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ordered read-only view of the items.
    pub fn items(&self) -> &VecDeque<Entity> {
        &self.items
    }
}

/// Which step routine an executable entity runs each tick.
///
/// A closed tag interpreted by one dispatch point in the engine, instead of
/// per-entity bound callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// The world driver: finds the agent and runs its decision loop.
    Driver,
    /// Bumps the parent agent's energy up by one.
    EnergyIncrease,
    /// Bumps the parent agent's energy down by one.
    EnergyDecrease,
}

/// The step-callback facet: entities carrying this are stepped once per
/// tick, in registration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Executable {
    pub kind: StepKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_grid_truncates() {
        assert_eq!(Spatial::at(3.0, 7.0).grid(), (3, 7));
        assert_eq!(Spatial::at(3.9, 7.1).grid(), (3, 7));
        assert_eq!(Spatial::at(0.0, 0.0).grid(), (0, 0));
    }

    #[test]
    fn test_container_preserves_order() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());

        let mut container = Container::default();
        assert!(container.is_empty());
        container.push(a);
        container.push(b);
        assert_eq!(container.len(), 2);
        assert_eq!(container.pop_front(), Some(a));
        assert_eq!(container.pop_front(), Some(b));
        assert_eq!(container.pop_front(), None);
    }
}
