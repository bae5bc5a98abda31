//! Neighborhood sensing - requesting a snapshot from the external renderer
//! and caching it for the tick.

use hecs::Entity;

use crate::components::{Image, NeighborhoodSensor};
use crate::world::World;

/// The boundary contract with the rendering side: given a world point and a
/// window size, hand back a pixel grid centered there. Pixels outside the
/// rendered area come back as the default color (black), never as an error.
pub trait SnapshotProvider {
    fn capture(&mut self, center_x: i32, center_y: i32, width: u32, height: u32) -> Image;
}

/// Capture one snapshot centered on the agent's grid cell and cache it in
/// the sensor. With no provider, no sensor, or an agent without a position,
/// the agent simply senses nothing this tick.
pub fn sensor_step(world: &World, agent: Entity, provider: Option<&mut (dyn SnapshotProvider + '_)>) {
    let sensor = match world.first_with::<NeighborhoodSensor>() {
        Some(sensor) => sensor,
        None => return,
    };
    let provider = match provider {
        Some(provider) => provider,
        None => {
            log::debug!("no snapshot provider; agent senses nothing");
            return;
        }
    };
    let (center_x, center_y) = match super::grid_position(world, agent) {
        Some(cell) => cell,
        None => return,
    };
    let window = world
        .component::<NeighborhoodSensor>(sensor)
        .map(|sensor| sensor.window)
        .unwrap_or(0);
    if window == 0 {
        return;
    }

    let image = provider.capture(center_x, center_y, window, window);
    if let Some(mut sensor) = world.component_mut::<NeighborhoodSensor>(sensor) {
        sensor.image = Some(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Rgb, Spatial};

    /// Provider that fills the window with one color and remembers what was
    /// asked of it.
    struct Flat {
        color: Rgb,
        last_request: Option<(i32, i32, u32, u32)>,
    }

    impl SnapshotProvider for Flat {
        fn capture(&mut self, center_x: i32, center_y: i32, width: u32, height: u32) -> Image {
            self.last_request = Some((center_x, center_y, width, height));
            let mut image = Image::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    image.set_pixel(x, y, self.color);
                }
            }
            image
        }
    }

    #[test]
    fn test_capture_caches_the_snapshot() {
        let mut world = World::seeded(1);
        let agent = world.spawn((Spatial::at(5.0, 9.0),));
        let sensor = world.spawn((NeighborhoodSensor::new(3),));

        let mut provider = Flat {
            color: Rgb::new(30, 30, 30),
            last_request: None,
        };
        sensor_step(&world, agent, Some(&mut provider));

        assert_eq!(provider.last_request, Some((5, 9, 3, 3)));
        let sensor = world.component::<NeighborhoodSensor>(sensor).unwrap();
        assert_eq!(sensor.size(), (3, 3));
        assert_eq!(sensor.pixel(1, 1), Rgb::new(30, 30, 30));
    }

    #[test]
    fn test_no_provider_leaves_cache_empty() {
        let mut world = World::seeded(1);
        let agent = world.spawn((Spatial::at(0.0, 0.0),));
        let sensor = world.spawn((NeighborhoodSensor::new(3),));

        sensor_step(&world, agent, None);

        let sensor = world.component::<NeighborhoodSensor>(sensor).unwrap();
        assert_eq!(sensor.size(), (0, 0));
        assert_eq!(sensor.pixel(0, 0), Rgb::BLACK);
    }

    #[test]
    fn test_agent_without_position_senses_nothing() {
        let mut world = World::seeded(1);
        let agent = world.spawn(());
        let sensor = world.spawn((NeighborhoodSensor::new(3),));

        let mut provider = Flat {
            color: Rgb::new(1, 2, 3),
            last_request: None,
        };
        sensor_step(&world, agent, Some(&mut provider));

        assert_eq!(provider.last_request, None);
        let sensor = world.component::<NeighborhoodSensor>(sensor).unwrap();
        assert_eq!(sensor.size(), (0, 0));
    }
}
