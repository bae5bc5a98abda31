//! Bounded history of time-frames.
//!
//! History is a container of TimeFrame entities with an eviction policy on
//! top: appending past the configured depth destroys the oldest frame along
//! with everything it recorded.

use hecs::Entity;

use crate::components::{Container, History, Name, TimeFrame};
use crate::world::World;

/// Open a fresh time-frame for this tick: spawn it, append it to the
/// history, and evict the oldest frame(s) while the history runs over its
/// depth. Eviction checks the size after the append, so it always reflects
/// the just-added frame.
pub fn open_frame(world: &mut World, history: Entity) -> Entity {
    let frame = world.spawn((TimeFrame, Container::default(), Name::new("TimeFrame")));
    world.container_push(history, frame);

    let depth = world
        .component::<History>(history)
        .map(|history| history.depth)
        .unwrap_or(0);
    while depth > 0 && world.container_len(history) > depth {
        match world.container_pop_front(history) {
            Some(evicted) => log::debug!("evicted time frame {:?}", evicted),
            None => break,
        }
    }
    frame
}

/// Record an entity into a time-frame: the runtime's registration table
/// lets go of it, the frame takes ownership, and the entity's data stays
/// readable until the frame is evicted.
pub fn memorize(world: &mut World, frame: Entity, entity: Entity) {
    world.detach_from_parent(entity);
    world.release(entity);
    world.container_push(frame, entity);
}

/// The frame currently being filled, i.e. the most recently opened one.
pub fn current_frame(world: &World, history: Entity) -> Option<Entity> {
    world.container_last(history)
}
