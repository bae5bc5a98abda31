//! World generation - configuration and initial population.

use serde::{Deserialize, Serialize};

use crate::components::{Agent, Board, Executable, Spatial, StepKind, Stone};
use crate::world::World;

/// Plain numeric configuration consumed at world construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid side length; the board holds `board_size²` squares.
    pub board_size: i32,
    /// How many time-frames the history retains before evicting.
    pub history_depth: usize,
    /// How many stones to scatter at setup.
    pub stone_count: usize,
    /// How many actions one queue refill draws.
    pub action_batch: usize,
    /// Screen-space side length of one square, for the renderer's benefit.
    pub square_size: f32,
    /// Side length of the sensor's snapshot window, in pixels.
    pub sensor_window: u32,
    /// The agent's starting grid cell.
    pub agent_start: (i32, i32),
    pub agent_energy: i32,
    /// Fixed random seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            board_size: 16,
            history_depth: 10,
            stone_count: 10,
            action_batch: 5,
            square_size: 10.0,
            sensor_window: 3,
            agent_start: (0, 0),
            agent_energy: 100,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Populate a fresh world: the driver, the board, the agent, and the
/// stones, in that registration order.
pub fn populate(world: &mut World, config: &WorldConfig) {
    world.spawn_named(
        "Life",
        (Executable {
            kind: StepKind::Driver,
        },),
    );

    world.spawn_named("Board", (Board::create(config.board_size, config.square_size),));
    log::info!("board created: {0}x{0}", config.board_size);

    world.spawn_named(
        "Agent",
        (
            Agent::new(
                config.agent_energy,
                config.action_batch,
                config.history_depth,
                config.sensor_window,
            ),
            Spatial::at(config.agent_start.0 as f32, config.agent_start.1 as f32),
        ),
    );

    if config.board_size > 0 {
        for _ in 0..config.stone_count {
            let x = world.random_int(0, config.board_size - 1);
            let y = world.random_int(0, config.board_size - 1);
            world.spawn((Stone, Spatial::at(x as f32, y as f32)));
        }
    }
    log::info!("world populated: {} stones", config.stone_count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_spawns_the_cast() {
        let mut world = World::seeded(3);
        populate(&mut world, &WorldConfig::default());

        assert!(world.single_by_name("Life").is_ok());
        assert!(world.single_by_name("Board").is_ok());
        assert!(world.single_by_name("Agent").is_ok());
        assert_eq!(world.all_with::<Stone>().len(), 10);
    }

    #[test]
    fn test_stones_land_on_the_board() {
        let mut world = World::seeded(5);
        let config = WorldConfig {
            board_size: 8,
            stone_count: 32,
            ..Default::default()
        };
        populate(&mut world, &config);

        for stone in world.all_with::<Stone>() {
            let (x, y) = world.component::<Spatial>(stone).unwrap().grid();
            assert!((0..8).contains(&x));
            assert!((0..8).contains(&y));
        }
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = WorldConfig {
            board_size: 12,
            seed: Some(9),
            ..Default::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let parsed = WorldConfig::from_json(&text).unwrap();
        assert_eq!(parsed.board_size, 12);
        assert_eq!(parsed.seed, Some(9));
    }

    #[test]
    fn test_config_json_defaults_missing_fields() {
        let parsed = WorldConfig::from_json(r#"{"board_size": 4}"#).unwrap();
        assert_eq!(parsed.board_size, 4);
        assert_eq!(parsed.history_depth, 10);
        assert_eq!(parsed.action_batch, 5);
    }
}
