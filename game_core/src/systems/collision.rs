use crate::{Body, Config};
use glam::Vec2;
use hecs::World;

/// Keep bodies inside the surface, bouncing off every edge
pub fn bounce_off_bounds(world: &mut World, bounds: Vec2, config: &Config) {
    for (_entity, body) in world.query_mut::<&mut Body>() {
        let r = body.radius;

        // Floor and ceiling
        if body.pos.y + r > bounds.y {
            body.pos.y = bounds.y - r;
            body.vel.y = -body.vel.y * config.restitution;
            body.vel.x *= 1.0 - config.surface_friction;
        } else if body.pos.y - r < 0.0 {
            body.pos.y = r;
            body.vel.y = -body.vel.y * config.restitution;
        }

        // Side walls
        if body.pos.x + r > bounds.x {
            body.pos.x = bounds.x - r;
            body.vel.x = -body.vel.x * config.restitution;
        } else if body.pos.x - r < 0.0 {
            body.pos.x = r;
            body.vel.x = -body.vel.x * config.restitution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, Config, Vec2) {
        (World::new(), Config::new(), Vec2::new(200.0, 100.0))
    }

    #[test]
    fn test_floor_bounce_reverses_and_damps() {
        let (mut world, config, bounds) = setup();
        let e = world.spawn((Body::new(Vec2::new(50.0, 99.0), Vec2::new(2.0, 10.0), 4.0),));

        bounce_off_bounds(&mut world, bounds, &config);

        let body = world.get::<&Body>(e).unwrap();
        assert_eq!(body.pos.y, 96.0, "Clamped to floor");
        assert_eq!(body.vel.y, -10.0 * config.restitution);
        assert!(body.vel.x < 2.0, "Floor friction applied");
    }

    #[test]
    fn test_wall_bounce() {
        let (mut world, config, bounds) = setup();
        let e = world.spawn((Body::new(Vec2::new(1.0, 50.0), Vec2::new(-3.0, 0.0), 4.0),));

        bounce_off_bounds(&mut world, bounds, &config);

        let body = world.get::<&Body>(e).unwrap();
        assert_eq!(body.pos.x, 4.0);
        assert!(body.vel.x > 0.0, "Bounced off left wall");
    }

    #[test]
    fn test_inside_untouched() {
        let (mut world, config, bounds) = setup();
        let e = world.spawn((Body::new(Vec2::new(100.0, 50.0), Vec2::new(1.0, 1.0), 4.0),));

        bounce_off_bounds(&mut world, bounds, &config);

        let body = world.get::<&Body>(e).unwrap();
        assert_eq!(body.pos, Vec2::new(100.0, 50.0));
        assert_eq!(body.vel, Vec2::new(1.0, 1.0));
    }
}
