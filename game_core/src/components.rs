use glam::Vec2;

/// Simulated rigid body (circle) in surface pixel space
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
        }
    }
}

/// Decorative particle attached to a body
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub color: [f32; 3],
    pub lifetime: f32, // 0-255, also drives alpha
}

impl Particle {
    pub fn new(color: [f32; 3], lifetime: f32) -> Self {
        Self { color, lifetime }
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    pub fn alpha(&self) -> f32 {
        (self.lifetime / 255.0).clamp(0.0, 1.0)
    }
}
