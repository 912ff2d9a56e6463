use hecs::World;

use crate::components::*;
use crate::config::Config;

/// Burn one tick of lifetime off every particle
pub fn decay_particles(world: &mut World, config: &Config) {
    for (_entity, particle) in world.query_mut::<&mut Particle>() {
        particle.lifetime -= config.particle_decay;
    }
}

/// Garbage collection: despawn expired particles together with their bodies.
/// Returns how many were removed.
pub fn gc(world: &mut World) -> usize {
    let to_remove: Vec<_> = world
        .query::<&Particle>()
        .iter()
        .filter(|(_e, particle)| particle.is_expired())
        .map(|(e, _)| e)
        .collect();

    for &entity in &to_remove {
        let _ = world.despawn(entity);
    }
    to_remove.len()
}
