pub mod components;
pub mod config;
pub mod effects;
pub mod layout;
pub mod params;
pub mod resources;
pub mod systems;

pub use components::*;
pub use config::*;
pub use effects::*;
pub use layout::*;
pub use params::*;
pub use resources::*;

use glam::Vec2;
use hecs::World;
use systems::*;

/// Run one tick of the particle simulation. Returns the number of particles
/// that expired and were despawned.
pub fn step(world: &mut World, bounds: Vec2, config: &Config) -> usize {
    // 1. Gravity, drag, integrate
    integrate_bodies(world, config);

    // 2. Keep bodies on the surface
    bounce_off_bounds(world, bounds, config);

    // 3. Age particles
    decay_particles(world, config);

    // 4. Remove the dead, bodies included
    gc(world)
}

/// Helper to create a particle entity
pub fn create_particle(world: &mut World, body: Body, particle: Particle) -> hecs::Entity {
    world.spawn((body, particle))
}
