//! The agent's per-tick decision loop: sense, then act.

use hecs::Entity;

use crate::components::{
    Agent, Collision, Container, History, MoveAction, MoveKind, Name, NeighborhoodSensor, Spatial,
    Stone,
};
use crate::systems::actions::execute_action;
use crate::systems::history::{memorize, open_frame};
use crate::systems::sensor::{sensor_step, SnapshotProvider};
use crate::world::World;

/// The grid cell an entity occupies, if it has a position.
pub fn grid_position(world: &World, entity: Entity) -> Option<(i32, i32)> {
    world.component::<Spatial>(entity).map(|spatial| spatial.grid())
}

/// Run one tick of the agent: construct helpers on the very first step,
/// open a new time-frame, sense (collisions, then the snapshot capture),
/// and execute one queued action.
pub fn agent_step(world: &mut World, agent: Entity, provider: Option<&mut (dyn SnapshotProvider + '_)>) {
    let first_step = world
        .component::<Agent>(agent)
        .map(|agent| agent.first_step)
        .unwrap_or(false);
    if first_step {
        construct_helpers(world, agent);
        if let Some(mut agent) = world.component_mut::<Agent>(agent) {
            agent.first_step = false;
        }
    }

    let history = match world.first_with::<History>() {
        Some(history) => history,
        None => {
            log::warn!("agent has no history; step skipped");
            return;
        }
    };
    let frame = open_frame(world, history);

    sense(world, agent, frame, provider);
    act(world, agent, frame);
}

/// Build the agent's helper entities, owned by the agent: the bounded
/// history and the neighborhood sensor.
fn construct_helpers(world: &mut World, agent: Entity) {
    let settings = world
        .component::<Agent>(agent)
        .map(|agent| (agent.history_depth, agent.sensor_window));
    let (depth, window) = match settings {
        Some(settings) => settings,
        None => return,
    };

    world.spawn_child(
        agent,
        (History { depth }, Container::default(), Name::new("History")),
    );
    world.spawn_child(
        agent,
        (NeighborhoodSensor::new(window), Name::new("NeighborhoodSensor")),
    );
    log::info!(
        "agent helpers constructed: history depth {}, sensor window {}",
        depth,
        window
    );
}

/// The sense phase: record one collision marker per stone sharing the
/// agent's cell, then capture the neighborhood snapshot.
fn sense(world: &mut World, agent: Entity, frame: Entity, provider: Option<&mut (dyn SnapshotProvider + '_)>) {
    if let Some(cell) = grid_position(world, agent) {
        // Read-only pass over the stones first; markers are spawned after
        // the scan so the iteration cursor never sees the table move.
        let coincident: Vec<Entity> = world
            .all_with::<Stone>()
            .into_iter()
            .filter(|&stone| grid_position(world, stone) == Some(cell))
            .collect();
        for stone in coincident {
            let marker = world.spawn_named("Collision", (Collision { stone },));
            memorize(world, frame, marker);
            log::debug!("collision with stone {:?} at {:?}", stone, cell);
        }
    }

    sensor_step(world, agent, provider);
}

/// The act phase: refill the pending queue when it runs dry, then dequeue
/// one action, execute it, and record it into the current frame.
fn act(world: &mut World, agent: Entity, frame: Entity) {
    let queue_state = world
        .component::<Agent>(agent)
        .map(|agent| (agent.pending.is_empty(), agent.batch));
    let (needs_refill, batch) = match queue_state {
        Some(state) => state,
        None => return,
    };
    if needs_refill {
        make_actions(world, agent, batch);
    }

    let action = world
        .component_mut::<Agent>(agent)
        .and_then(|mut agent| agent.pending.pop_front());
    let action = match action {
        Some(action) => action,
        None => return,
    };

    execute_action(world, action);
    memorize(world, frame, action);
}

/// Refill the agent's pending queue: draw `batch` actions independently and
/// uniformly from the five kinds, each bound to the agent as its target.
pub fn make_actions(world: &mut World, agent: Entity, batch: usize) {
    for _ in 0..batch {
        let kind = match world.random_int(0, 4) {
            0 => MoveKind::StandBy,
            1 => MoveKind::North,
            2 => MoveKind::South,
            3 => MoveKind::East,
            _ => MoveKind::West,
        };
        let action = world.spawn_child(agent, (MoveAction::new(kind, agent),));
        if let Some(mut agent) = world.component_mut::<Agent>(agent) {
            agent.pending.push_back(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Board, Stone};
    use crate::systems::history::current_frame;

    fn seeded_world() -> (World, Entity) {
        let mut world = World::seeded(7);
        world.spawn_named("Board", (Board::create(16, 10.0),));
        let agent = world.spawn_named("Agent", (Agent::new(100, 5, 10, 3), Spatial::at(8.0, 8.0)));
        (world, agent)
    }

    #[test]
    fn test_first_step_constructs_helpers() {
        let (mut world, agent) = seeded_world();
        assert!(world.first_with::<History>().is_none());
        assert!(world.first_with::<NeighborhoodSensor>().is_none());

        agent_step(&mut world, agent, None);

        assert!(world.first_with::<History>().is_some());
        assert!(world.first_with::<NeighborhoodSensor>().is_some());
        assert!(!world.component::<Agent>(agent).unwrap().first_step);

        // Constructed once, not per tick.
        agent_step(&mut world, agent, None);
        assert_eq!(world.all_with::<History>().len(), 1);
        assert_eq!(world.all_with::<NeighborhoodSensor>().len(), 1);
    }

    #[test]
    fn test_queue_refills_by_batch() {
        let (mut world, agent) = seeded_world();

        agent_step(&mut world, agent, None);
        // One refill of five, one executed.
        assert_eq!(world.component::<Agent>(agent).unwrap().pending.len(), 4);

        for _ in 0..4 {
            agent_step(&mut world, agent, None);
        }
        assert_eq!(world.component::<Agent>(agent).unwrap().pending.len(), 0);

        agent_step(&mut world, agent, None);
        assert_eq!(world.component::<Agent>(agent).unwrap().pending.len(), 4);
    }

    #[test]
    fn test_executed_action_lands_in_current_frame() {
        let (mut world, agent) = seeded_world();
        agent_step(&mut world, agent, None);

        let history = world.first_with::<History>().unwrap();
        let frame = current_frame(&world, history).unwrap();
        let recorded = world.container_items(frame);
        assert_eq!(recorded.len(), 1);
        let action = recorded[0];
        assert!(world.component::<MoveAction>(action).is_some());
        // Destroyed from the table, retained by the frame.
        assert!(!world.is_registered(action));
        assert!(world.contains(action));
    }

    #[test]
    fn test_collision_markers_one_per_stone() {
        let (mut world, agent) = seeded_world();
        world.spawn((Stone, Spatial::at(8.0, 8.0)));
        world.spawn((Stone, Spatial::at(8.0, 8.0)));
        world.spawn((Stone, Spatial::at(2.0, 2.0)));

        agent_step(&mut world, agent, None);

        let history = world.first_with::<History>().unwrap();
        let frame = current_frame(&world, history).unwrap();
        let collisions: Vec<Entity> = world
            .container_items(frame)
            .into_iter()
            .filter(|&e| world.component::<Collision>(e).is_some())
            .collect();
        assert_eq!(collisions.len(), 2);
    }

    #[test]
    fn test_no_collision_when_cells_differ() {
        let (mut world, agent) = seeded_world();
        world.spawn((Stone, Spatial::at(1.0, 1.0)));

        agent_step(&mut world, agent, None);

        let history = world.first_with::<History>().unwrap();
        let frame = current_frame(&world, history).unwrap();
        let collisions = world
            .container_items(frame)
            .into_iter()
            .filter(|&e| world.component::<Collision>(e).is_some())
            .count();
        assert_eq!(collisions, 0);
    }

    #[test]
    fn test_history_stays_bounded_across_steps() {
        let (mut world, agent) = seeded_world();
        for ticks in 1..=25usize {
            agent_step(&mut world, agent, None);
            let history = world.first_with::<History>().unwrap();
            assert_eq!(world.container_len(history), ticks.min(10));
        }
    }
}
