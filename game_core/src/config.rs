use crate::params::Params;

/// Runtime configuration, defaults from [`Params`]
#[derive(Debug, Clone)]
pub struct Config {
    pub effects_enabled: bool,
    pub particles_per_spawn: usize,
    pub max_particles: usize,
    pub particle_lifetime: f32,
    pub particle_decay: f32,
    pub particle_radius_min: f32,
    pub particle_radius_max: f32,
    pub particle_speed_max: f32,
    pub gravity: f32,
    pub restitution: f32,
    pub air_friction: f32,
    pub surface_friction: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            effects_enabled: true,
            particles_per_spawn: Params::PARTICLES_PER_SPAWN,
            max_particles: Params::MAX_PARTICLES,
            particle_lifetime: Params::PARTICLE_LIFETIME,
            particle_decay: Params::PARTICLE_DECAY,
            particle_radius_min: Params::PARTICLE_RADIUS_MIN,
            particle_radius_max: Params::PARTICLE_RADIUS_MAX,
            particle_speed_max: Params::PARTICLE_SPEED_MAX,
            gravity: Params::GRAVITY,
            restitution: Params::RESTITUTION,
            air_friction: Params::AIR_FRICTION,
            surface_friction: Params::SURFACE_FRICTION,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks a freshly spawned particle survives
    pub fn particle_ticks(&self) -> u32 {
        if self.particle_decay <= 0.0 {
            return u32::MAX;
        }
        (self.particle_lifetime / self.particle_decay).ceil() as u32
    }
}
