//! Simulation engine - the tick driver and main entry point.

use hecs::Entity;

use crate::components::{Agent, Executable, History, StepKind};
use crate::generation::{self, WorldConfig};
use crate::systems::{
    agent_step, energy_decrease_step, energy_increase_step, grid_position, SnapshotProvider,
};
use crate::world::World;

/// Main simulation engine: owns the world, the tick counter and the
/// optional snapshot provider the sensor consumes.
pub struct Engine {
    world: World,
    config: WorldConfig,
    provider: Option<Box<dyn SnapshotProvider>>,
    ticks: u64,
}

impl Engine {
    /// Build and populate a world from the configuration.
    pub fn new(config: WorldConfig) -> Self {
        let mut world = match config.seed {
            Some(seed) => World::seeded(seed),
            None => World::new(),
        };
        generation::populate(&mut world, &config);
        Self {
            world,
            config,
            provider: None,
            ticks: 0,
        }
    }

    /// Install the external image provider the neighborhood sensor queries.
    pub fn with_provider(mut self, provider: Box<dyn SnapshotProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn set_provider(&mut self, provider: Box<dyn SnapshotProvider>) {
        self.provider = Some(provider);
    }

    /// Advance the simulation by one tick: every executable entity is
    /// stepped exactly once, in registration order. The steppable set is
    /// collected up front so a step removing entities never races the
    /// cursor.
    pub fn tick(&mut self) {
        let steppables: Vec<(Entity, StepKind)> = self
            .world
            .entities()
            .filter_map(|entity| {
                self.world
                    .component::<Executable>(entity)
                    .map(|exe| (entity, exe.kind))
            })
            .collect();

        for (entity, kind) in steppables {
            if !self.world.contains(entity) {
                continue;
            }
            match kind {
                StepKind::Driver => driver_step(&mut self.world, self.provider.as_deref_mut()),
                StepKind::EnergyIncrease => energy_increase_step(&self.world, entity),
                StepKind::EnergyDecrease => energy_decrease_step(&self.world, entity),
            }
        }
        self.ticks += 1;
    }

    /// Run `count` ticks back to back.
    pub fn run(&mut self, count: u64) {
        for _ in 0..count {
            self.tick();
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // ── Convenience views ───────────────────────────────────────────────

    pub fn agent(&self) -> Option<Entity> {
        self.world.first_with::<Agent>()
    }

    pub fn agent_position(&self) -> Option<(i32, i32)> {
        grid_position(&self.world, self.agent()?)
    }

    pub fn agent_energy(&self) -> Option<i32> {
        self.agent()
            .and_then(|agent| self.world.component::<Agent>(agent).map(|a| a.energy))
    }

    /// Actions still waiting in the agent's queue.
    pub fn pending_actions(&self) -> usize {
        self.agent()
            .and_then(|agent| self.world.component::<Agent>(agent).map(|a| a.pending.len()))
            .unwrap_or(0)
    }

    pub fn history(&self) -> Option<Entity> {
        self.world.first_with::<History>()
    }

    /// Number of retained time-frames.
    pub fn history_len(&self) -> usize {
        self.history()
            .map(|history| self.world.container_len(history))
            .unwrap_or(0)
    }
}

/// The world driver's own step: locate the agent and forward control to its
/// decision loop. Zero or several agents means nothing to drive this tick.
pub fn driver_step(world: &mut World, provider: Option<&mut (dyn SnapshotProvider + '_)>) {
    match world.single_with::<Agent>() {
        Ok(agent) => agent_step(world, agent, provider),
        Err(err) => log::debug!("driver idle: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Image, NeighborhoodSensor, Rgb, Stone};
    use crate::systems::{attach_energy_increase, SnapshotProvider};

    struct Checker;

    impl SnapshotProvider for Checker {
        fn capture(&mut self, center_x: i32, center_y: i32, width: u32, height: u32) -> Image {
            let mut image = Image::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    let parity = (center_x + center_y + x as i32 + y as i32) % 2 == 0;
                    let shade = if parity { 30 } else { 100 };
                    image.set_pixel(x, y, Rgb::new(shade, shade, shade));
                }
            }
            image
        }
    }

    fn scenario_config() -> WorldConfig {
        WorldConfig {
            board_size: 16,
            history_depth: 10,
            stone_count: 10,
            action_batch: 5,
            agent_start: (8, 8),
            agent_energy: 100,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new(scenario_config());
        assert_eq!(engine.ticks(), 0);
        assert_eq!(engine.agent_position(), Some((8, 8)));
        assert_eq!(engine.agent_energy(), Some(100));
        assert_eq!(engine.history_len(), 0);
    }

    #[test]
    fn test_end_to_end_bounded_run() {
        let mut engine = Engine::new(scenario_config());

        for tick in 1..=25usize {
            engine.tick();

            let (x, y) = engine.agent_position().expect("agent has a position");
            assert!((0..16).contains(&x), "x out of bounds at tick {}", tick);
            assert!((0..16).contains(&y), "y out of bounds at tick {}", tick);

            assert_eq!(engine.history_len(), tick.min(10));

            // The queue refills by five exactly when it runs dry.
            assert_eq!(engine.pending_actions(), 4 - ((tick - 1) % 5));
        }
        assert_eq!(engine.ticks(), 25);
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = Engine::new(scenario_config());
        let mut b = Engine::new(scenario_config());

        for _ in 0..25 {
            a.tick();
            b.tick();
            assert_eq!(a.agent_position(), b.agent_position());
        }
    }

    #[test]
    fn test_provider_feeds_the_sensor() {
        let mut engine = Engine::new(scenario_config()).with_provider(Box::new(Checker));
        engine.tick();

        let world = engine.world();
        let sensor = world.first_with::<NeighborhoodSensor>().unwrap();
        let sensor = world.component::<NeighborhoodSensor>(sensor).unwrap();
        assert_eq!(sensor.size(), (3, 3));
    }

    #[test]
    fn test_energy_events_run_each_tick() {
        let mut engine = Engine::new(scenario_config());
        let agent = engine.agent().unwrap();
        attach_energy_increase(engine.world_mut(), agent);

        engine.run(5);
        assert_eq!(engine.agent_energy(), Some(105));
    }

    #[test]
    fn test_stone_on_start_cell_is_recorded() {
        let mut engine = Engine::new(WorldConfig {
            stone_count: 0,
            ..scenario_config()
        });
        engine.world_mut().spawn((Stone, crate::components::Spatial::at(8.0, 8.0)));

        engine.tick();

        let world = engine.world();
        let history = engine.history().unwrap();
        let frame = world.container_last(history).unwrap();
        let collisions = world
            .container_items(frame)
            .into_iter()
            .filter(|&e| world.component::<crate::components::Collision>(e).is_some())
            .count();
        assert!(collisions >= 1);
    }
}
