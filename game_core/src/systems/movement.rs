use crate::{Body, Config};
use hecs::World;

/// Apply gravity and air drag, then advance bodies by one tick
pub fn integrate_bodies(world: &mut World, config: &Config) {
    let drag = 1.0 - config.air_friction;
    for (_entity, body) in world.query_mut::<&mut Body>() {
        body.vel.y += config.gravity;
        body.vel *= drag;
        body.pos += body.vel;
    }
}
