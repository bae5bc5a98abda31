//! Movement rule execution - one dispatch over the closed set of action
//! kinds.

use hecs::Entity;

use crate::components::{Board, MoveAction, MoveKind, Spatial};
use crate::world::World;

/// Execute an action entity's movement rule against its bound target.
/// Missing action data, a missing target, or a target without a position
/// all degrade to a no-op.
pub fn execute_action(world: &mut World, action: Entity) {
    let bound = world
        .component::<MoveAction>(action)
        .map(|action| (action.kind, action.target));
    let (kind, target) = match bound {
        Some(bound) => bound,
        None => return,
    };
    let target = match target {
        Some(target) => target,
        None => return,
    };
    apply_move(world, target, kind);
}

/// Move `target` one cell in the rule's direction, clamped at the grid
/// edges.
///
/// North and West gate on the coordinate itself (a literal lower bound of
/// 1 before decrementing, as the original rules did); South and East gate
/// on the board's size, truncating the float position to its grid cell
/// first. Without a board in the world, South and East do nothing.
pub fn apply_move(world: &mut World, target: Entity, kind: MoveKind) {
    let position = match world.component::<Spatial>(target) {
        Some(spatial) => spatial.position,
        None => return,
    };

    let mut next = position;
    match kind {
        MoveKind::StandBy => return,
        MoveKind::North => {
            if position.y >= 1.0 {
                next.y = position.y - 1.0;
            }
        }
        MoveKind::West => {
            if position.x >= 1.0 {
                next.x = position.x - 1.0;
            }
        }
        MoveKind::South => {
            let size = match board_size(world) {
                Some(size) => size,
                None => {
                    log::debug!("no board; move south skipped");
                    return;
                }
            };
            if (position.y as i32) < size - 1 {
                next.y = position.y + 1.0;
            }
        }
        MoveKind::East => {
            let size = match board_size(world) {
                Some(size) => size,
                None => {
                    log::debug!("no board; move east skipped");
                    return;
                }
            };
            if (position.x as i32) < size - 1 {
                next.x = position.x + 1.0;
            }
        }
    }

    if let Some(mut spatial) = world.component_mut::<Spatial>(target) {
        spatial.position = next;
    }
}

/// Size of the world's board, if one exists.
pub fn board_size(world: &World) -> Option<i32> {
    let board = world.first_with::<Board>()?;
    world.component::<Board>(board).map(|board| board.size())
}
