//! Movement action components.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// The five action kinds an agent can draw, as a closed tag. The movement
/// rule for each is a single dispatch in `systems::actions` rather than a
/// callback bound per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    StandBy,
    North,
    South,
    East,
    West,
}

/// A short-lived action entity: one unit of behavior bound to the entity it
/// will move, executed once and then recorded into the current time-frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveAction {
    pub kind: MoveKind,
    /// The mover. Executing with no target is a silent no-op.
    #[serde(skip)]
    pub target: Option<Entity>,
}

impl MoveAction {
    pub fn new(kind: MoveKind, target: Entity) -> Self {
        Self {
            kind,
            target: Some(target),
        }
    }
}
