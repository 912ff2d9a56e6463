//! Decorative particle effects
//!
//! Purely local: spawned by pointer presses, never fed by or fed into the
//! network protocol. The render loop only talks to the [`Effects`] trait, so
//! the simulation can be swapped for [`NoEffects`] without touching anything
//! else.

use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::{create_particle, Body, Config, GameRng, Particle};

/// Render-ready view of one live particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

/// Minimal interface between the render loop and an effects simulation
pub trait Effects {
    /// Burst of particles at `at` (surface pixels)
    fn spawn(&mut self, at: Vec2);

    /// Advance one tick inside `bounds`. Returns the number of particles that expired.
    fn step(&mut self, bounds: Vec2) -> usize;

    fn sprites(&self) -> Vec<Sprite>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every particle
    fn clear(&mut self);
}

/// Effects disabled
#[derive(Debug, Default)]
pub struct NoEffects;

impl Effects for NoEffects {
    fn spawn(&mut self, _at: Vec2) {}

    fn step(&mut self, _bounds: Vec2) -> usize {
        0
    }

    fn sprites(&self) -> Vec<Sprite> {
        Vec::new()
    }

    fn len(&self) -> usize {
        0
    }

    fn clear(&mut self) {}
}

/// Particles as rigid bodies in an ECS world
pub struct ParticleWorld {
    world: World,
    rng: GameRng,
    config: Config,
}

impl ParticleWorld {
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            world: World::new(),
            rng: GameRng::new(seed),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn spawn_one(&mut self, at: Vec2) {
        let rng = &mut self.rng.0;
        let c = &self.config;

        let radius = if c.particle_radius_max > c.particle_radius_min {
            rng.gen_range(c.particle_radius_min..c.particle_radius_max)
        } else {
            c.particle_radius_min
        };
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed: f32 = rng.gen_range(0.0..=c.particle_speed_max);
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;

        let body = Body::new(at, vel, radius);

        let color = [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()];
        create_particle(&mut self.world, body, Particle::new(color, c.particle_lifetime));
    }
}

impl Effects for ParticleWorld {
    fn spawn(&mut self, at: Vec2) {
        let room = self.config.max_particles.saturating_sub(self.len());
        let count = self.config.particles_per_spawn.min(room);
        for _ in 0..count {
            self.spawn_one(at);
        }
        tracing::trace!(count, total = self.len(), "spawned particles");
    }

    fn step(&mut self, bounds: Vec2) -> usize {
        crate::step(&mut self.world, bounds, &self.config)
    }

    fn sprites(&self) -> Vec<Sprite> {
        self.world
            .query::<(&Body, &Particle)>()
            .iter()
            .map(|(_e, (body, particle))| Sprite {
                pos: body.pos,
                radius: body.radius,
                color: [
                    particle.color[0],
                    particle.color[1],
                    particle.color[2],
                    particle.alpha(),
                ],
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.world.len() as usize
    }

    fn clear(&mut self) {
        self.world.clear();
    }
}

/// Pick the effects implementation for a config
pub fn effects_for(config: Config, seed: u64) -> Box<dyn Effects> {
    if config.effects_enabled {
        Box::new(ParticleWorld::new(config, seed))
    } else {
        Box::new(NoEffects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_spawn_creates_burst() {
        let mut fx = ParticleWorld::new(Config::new(), 7);
        fx.spawn(Vec2::new(100.0, 100.0));
        assert_eq!(fx.len(), Config::new().particles_per_spawn);
        for sprite in fx.sprites() {
            assert_eq!(sprite.color[3], 1.0, "Fresh particles are opaque");
            assert!(sprite.radius >= fx.config().particle_radius_min);
        }
    }

    #[test]
    fn test_spawn_respects_cap() {
        let config = Config {
            max_particles: 20,
            ..Config::new()
        };
        let mut fx = ParticleWorld::new(config, 7);
        fx.spawn(Vec2::ZERO);
        fx.spawn(Vec2::ZERO);
        fx.spawn(Vec2::ZERO);
        assert_eq!(fx.len(), 20);
    }

    #[test]
    fn test_no_effects_is_inert() {
        let mut fx = effects_for(
            Config {
                effects_enabled: false,
                ..Config::new()
            },
            1,
        );
        fx.spawn(Vec2::new(10.0, 10.0));
        assert!(fx.is_empty());
        assert_eq!(fx.step(BOUNDS), 0);
        assert!(fx.sprites().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut fx = ParticleWorld::new(Config::new(), 3);
        fx.spawn(Vec2::new(5.0, 5.0));
        fx.clear();
        assert!(fx.is_empty());
    }
}
