//! Energy events - counter bumps attached to the agent, independent of the
//! action loop.

use hecs::Entity;

use crate::components::{Agent, Executable, Name, Parent, StepKind};
use crate::world::World;

/// Attach an energy-increase event to the agent; it adds one to the
/// agent's energy every tick it is stepped.
pub fn attach_energy_increase(world: &mut World, agent: Entity) -> Entity {
    world.spawn_child(
        agent,
        (
            Executable {
                kind: StepKind::EnergyIncrease,
            },
            Name::new("EnergyIncrease"),
        ),
    )
}

/// Attach an energy-decrease event to the agent; the symmetric decrement.
pub fn attach_energy_decrease(world: &mut World, agent: Entity) -> Entity {
    world.spawn_child(
        agent,
        (
            Executable {
                kind: StepKind::EnergyDecrease,
            },
            Name::new("EnergyDecrease"),
        ),
    )
}

pub fn energy_increase_step(world: &World, event: Entity) {
    adjust_energy(world, event, 1);
}

pub fn energy_decrease_step(world: &World, event: Entity) {
    adjust_energy(world, event, -1);
}

fn adjust_energy(world: &World, event: Entity, delta: i32) {
    let parent = match world.component::<Parent>(event) {
        Some(parent) => parent.0,
        None => return,
    };
    if let Some(mut agent) = world.component_mut::<Agent>(parent) {
        agent.energy += delta;
    }
}
