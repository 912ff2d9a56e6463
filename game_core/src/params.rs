/// Tuning parameters for the client-side effects and scene
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Particles
    pub const PARTICLES_PER_SPAWN: usize = 12;
    pub const MAX_PARTICLES: usize = 600;
    pub const PARTICLE_LIFETIME: f32 = 255.0; // doubles as alpha (0-255)
    pub const PARTICLE_DECAY: f32 = 5.0; // lifetime lost per tick
    pub const PARTICLE_RADIUS_MIN: f32 = 3.0; // pixels
    pub const PARTICLE_RADIUS_MAX: f32 = 8.0;
    pub const PARTICLE_SPEED_MAX: f32 = 6.0; // pixels per tick

    // Physics (per tick, pixel space, +y is down)
    pub const GRAVITY: f32 = 0.4;
    pub const RESTITUTION: f32 = 0.8;
    pub const AIR_FRICTION: f32 = 0.01;
    pub const SURFACE_FRICTION: f32 = 0.3;

    // Centre line, as fractions of surface size
    pub const CENTER_DASH_SPACING: f32 = 0.05;
    pub const CENTER_DASH_LENGTH: f32 = 0.025;
    pub const CENTER_LINE_WIDTH: f32 = 0.002;
    pub const CENTER_LINE_ALPHA: f32 = 100.0 / 255.0;

    // Scoreboard
    pub const SCORE_FONT_SCALE: f32 = 0.05; // of surface width
    pub const SCORE_FONT_MIN: f32 = 16.0; // pixels
    pub const SCORE_FONT_MAX: f32 = 48.0;
}
