//! Chesslife Headless Simulation Harness
//!
//! Validates the sandbox's observable properties without a renderer.
//! Runs entirely in-process - no window, no networking.
//!
//! Usage:
//!   cargo run -p chesslife-simtest
//!   cargo run -p chesslife-simtest -- --verbose

use chesslife_core::prelude::*;
use chesslife_core::systems::{apply_move, SnapshotProvider};
use serde::Deserialize;

// ── Scenario (config plus run parameters) ───────────────────────────────
const SCENARIO_JSON: &str = include_str!("../../../data/scenario.json");

#[derive(Debug, Deserialize)]
struct Scenario {
    config: WorldConfig,
    ticks: u64,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        }
    }
}

/// Stateless stand-in for the external renderer: a checker pattern keyed on
/// world coordinates, so captures at different cells look different.
struct CheckerRasterizer;

impl SnapshotProvider for CheckerRasterizer {
    fn capture(&mut self, center_x: i32, center_y: i32, width: u32, height: u32) -> Image {
        let mut image = Image::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let parity = (center_x + center_y + x as i32 + y as i32).rem_euclid(2) == 0;
                let shade = if parity { 30 } else { 100 };
                image.set_pixel(x, y, Rgb::new(shade, shade, shade));
            }
        }
        image
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Chesslife Simulation Harness ===\n");

    let scenario: Scenario = match serde_json::from_str(SCENARIO_JSON) {
        Ok(scenario) => scenario,
        Err(err) => {
            println!("scenario JSON failed to parse: {}", err);
            std::process::exit(1);
        }
    };
    let config = &scenario.config;

    let mut results = Vec::new();

    // 1. Board addressing sweep
    results.extend(validate_board_addressing());

    // 2. Movement clamping at every edge
    results.extend(validate_clamped_movement());

    // 3. Bounded history across run lengths
    results.extend(validate_bounded_history(config));

    // 4. Eviction order
    results.extend(validate_eviction_order(config));

    // 5. Sensor defaults and capture
    results.extend(validate_sensor(config));

    // 6. Collision recording
    results.extend(validate_collision(config));

    // 7. End-to-end scenario run
    results.extend(validate_end_to_end(config, scenario.ticks));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Board addressing ─────────────────────────────────────────────────

fn validate_board_addressing() -> Vec<TestResult> {
    let board = Board::create(16, 10.0);
    let mut mismatches = 0;
    for y in 0..16 {
        for x in 0..16 {
            match board.square(x, y) {
                Some(square) if square.x == x && square.y == y => {}
                _ => mismatches += 1,
            }
        }
    }
    let oob_rejected = board.square(-1, 0).is_none()
        && board.square(0, -1).is_none()
        && board.square(16, 0).is_none()
        && board.square(0, 16).is_none();

    vec![
        TestResult::check(
            "board_addressing",
            mismatches == 0,
            format!("{} mismatched squares over 16x16", mismatches),
        ),
        TestResult::check(
            "board_bounds",
            oob_rejected,
            "out-of-range lookups return nothing",
        ),
    ]
}

// ── 2. Clamped movement ─────────────────────────────────────────────────

fn validate_clamped_movement() -> Vec<TestResult> {
    let mut world = World::seeded(1);
    world.spawn_named("Board", (Board::create(16, 10.0),));

    let cases = [
        ((0.0, 0.0), MoveKind::North, (0, 0)),
        ((0.0, 0.0), MoveKind::West, (0, 0)),
        ((15.0, 15.0), MoveKind::South, (15, 15)),
        ((15.0, 15.0), MoveKind::East, (15, 15)),
        ((8.0, 8.0), MoveKind::North, (8, 7)),
        ((8.0, 8.0), MoveKind::South, (8, 9)),
        ((8.0, 8.0), MoveKind::East, (9, 8)),
        ((8.0, 8.0), MoveKind::West, (7, 8)),
        ((8.0, 8.0), MoveKind::StandBy, (8, 8)),
    ];

    let mut failures = Vec::new();
    for ((x, y), kind, expected) in cases {
        let mover = world.spawn((Spatial::at(x, y),));
        apply_move(&mut world, mover, kind);
        let landed = world
            .component::<Spatial>(mover)
            .map(|s| s.grid())
            .unwrap_or((-1, -1));
        if landed != expected {
            failures.push(format!("{:?} from ({}, {}) landed at {:?}", kind, x, y, landed));
        }
        world.remove_entity(mover);
    }

    vec![TestResult::check(
        "clamped_movement",
        failures.is_empty(),
        if failures.is_empty() {
            "all edge and open-field moves land where expected".to_string()
        } else {
            failures.join("; ")
        },
    )]
}

// ── 3. Bounded history ──────────────────────────────────────────────────

fn validate_bounded_history(scenario: &WorldConfig) -> Vec<TestResult> {
    let mut results = Vec::new();
    for ticks in [3u64, 10, 25] {
        let mut engine = Engine::new(scenario.clone());
        engine.run(ticks);
        let expected = (ticks as usize).min(scenario.history_depth);
        results.push(TestResult::check(
            &format!("bounded_history_{}_ticks", ticks),
            engine.history_len() == expected,
            format!("length {} (expected {})", engine.history_len(), expected),
        ));
    }
    results
}

// ── 4. Eviction order ───────────────────────────────────────────────────

fn validate_eviction_order(scenario: &WorldConfig) -> Vec<TestResult> {
    let mut engine = Engine::new(WorldConfig {
        history_depth: 3,
        ..scenario.clone()
    });

    engine.run(3);
    let history = match engine.history() {
        Some(history) => history,
        None => {
            return vec![TestResult::check("eviction_order", false, "no history entity")];
        }
    };
    let before = engine.world().container_items(history);

    engine.tick();
    let after = engine.world().container_items(history);

    let oldest_evicted = !engine.world().contains(before[0]) && !after.contains(&before[0]);
    let shifted = after.len() == 3 && after[0] == before[1] && after[1] == before[2];

    vec![TestResult::check(
        "eviction_order",
        oldest_evicted && shifted,
        "oldest frame evicted, second-oldest promoted",
    )]
}

// ── 5. Sensor ───────────────────────────────────────────────────────────

fn validate_sensor(scenario: &WorldConfig) -> Vec<TestResult> {
    let mut results = Vec::new();

    // Defaults before any capture: drive a tick without a provider.
    let mut blind = Engine::new(scenario.clone());
    blind.tick();
    let world = blind.world();
    let defaults_hold = match world.first_with::<NeighborhoodSensor>() {
        Some(sensor) => {
            let sensor = world.component::<NeighborhoodSensor>(sensor).unwrap();
            sensor.size() == (0, 0) && sensor.pixel(0, 0) == Rgb::BLACK
        }
        None => false,
    };
    results.push(TestResult::check(
        "sensor_defaults",
        defaults_hold,
        "size (0,0) and black pixels before any capture",
    ));

    // With a provider, one tick caches a window-sized snapshot.
    let mut sighted = Engine::new(scenario.clone()).with_provider(Box::new(CheckerRasterizer));
    sighted.tick();
    let world = sighted.world();
    let captured = match world.first_with::<NeighborhoodSensor>() {
        Some(sensor) => {
            let sensor = world.component::<NeighborhoodSensor>(sensor).unwrap();
            sensor.size() == (scenario.sensor_window, scenario.sensor_window)
        }
        None => false,
    };
    results.push(TestResult::check(
        "sensor_capture",
        captured,
        format!(
            "cached a {0}x{0} snapshot after one tick",
            scenario.sensor_window
        ),
    ));

    results
}

// ── 6. Collision recording ──────────────────────────────────────────────

fn validate_collision(scenario: &WorldConfig) -> Vec<TestResult> {
    let mut engine = Engine::new(WorldConfig {
        stone_count: 0,
        ..scenario.clone()
    });
    let start = scenario.agent_start;
    engine
        .world_mut()
        .spawn((Stone, Spatial::at(start.0 as f32, start.1 as f32)));

    engine.tick();

    let world = engine.world();
    let markers = match engine.history().and_then(|h| world.container_last(h)) {
        Some(frame) => world
            .container_items(frame)
            .into_iter()
            .filter(|&e| world.component::<Collision>(e).is_some())
            .count(),
        None => 0,
    };

    vec![TestResult::check(
        "collision_recording",
        markers >= 1,
        format!("{} marker(s) in the current time-frame", markers),
    )]
}

// ── 7. End-to-end scenario ──────────────────────────────────────────────

fn validate_end_to_end(scenario: &WorldConfig, ticks: u64) -> Vec<TestResult> {
    let mut engine = Engine::new(scenario.clone()).with_provider(Box::new(CheckerRasterizer));
    let mut twin = Engine::new(scenario.clone());

    let size = scenario.board_size;
    let mut in_bounds = true;
    let mut refills_on_schedule = true;
    let mut deterministic = true;

    for tick in 1..=ticks as usize {
        engine.tick();
        twin.tick();

        match engine.agent_position() {
            Some((x, y)) => {
                in_bounds &= (0..size).contains(&x) && (0..size).contains(&y);
            }
            None => in_bounds = false,
        }
        let expected_pending = scenario.action_batch - 1 - ((tick - 1) % scenario.action_batch);
        refills_on_schedule &= engine.pending_actions() == expected_pending;
        deterministic &= engine.agent_position() == twin.agent_position();
    }

    vec![
        TestResult::check(
            "scenario_history",
            engine.history_len() == scenario.history_depth,
            format!("history settled at depth {}", engine.history_len()),
        ),
        TestResult::check(
            "scenario_bounds",
            in_bounds,
            format!("agent stayed on the board for {} ticks", ticks),
        ),
        TestResult::check(
            "scenario_refills",
            refills_on_schedule,
            "queue refilled exactly every batch",
        ),
        TestResult::check(
            "scenario_determinism",
            deterministic,
            "seeded twin walked the same path",
        ),
        TestResult::check(
            "scenario_energy",
            engine.agent_energy() == Some(scenario.agent_energy),
            format!("energy untouched at {:?}", engine.agent_energy()),
        ),
    ]
}
