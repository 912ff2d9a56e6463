//! Surface sizing and normalized-to-pixel projection

use glam::Vec2;
use proto::{GameSpecs, GameState};

/// Drawable surface (or container) size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Largest surface with the given aspect ratio that fits the container:
/// fill the width, and if the height would overflow, fill the height instead.
pub fn fit_surface(container: SurfaceSize, aspect: f32) -> SurfaceSize {
    if container.is_empty() || !(aspect > 0.0 && aspect.is_finite()) {
        return SurfaceSize::default();
    }
    let mut width = container.width;
    let mut height = width / aspect;
    if height > container.height {
        height = container.height;
        width = height * aspect;
    }
    SurfaceSize { width, height }
}

/// Normalized positions to draw this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPositions {
    pub ball: Vec2,
    pub left_paddle_y: f32,
    pub right_paddle_y: f32,
}

impl FieldPositions {
    /// Latest snapshot, or the specs' starting positions if none has arrived
    pub fn resolve(snapshot: Option<&GameState>, specs: &GameSpecs) -> Self {
        match snapshot {
            Some(state) => Self {
                ball: Vec2::new(state.ball.x, state.ball.y),
                left_paddle_y: state.paddles.left,
                right_paddle_y: state.paddles.right,
            },
            None => Self {
                ball: Vec2::new(specs.ball.initial.x, specs.ball.initial.y),
                left_paddle_y: specs.paddle.initial.y,
                right_paddle_y: specs.paddle.initial.y,
            },
        }
    }
}

/// Projects normalized field coordinates onto a surface
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    pub surface: SurfaceSize,
    pub specs: &'a GameSpecs,
}

impl<'a> Projection<'a> {
    pub fn new(surface: SurfaceSize, specs: &'a GameSpecs) -> Self {
        Self { surface, specs }
    }

    pub fn point(&self, normalized: Vec2) -> Vec2 {
        normalized * self.surface.as_vec2()
    }

    pub fn paddle_size(&self) -> Vec2 {
        Vec2::new(
            self.surface.width * self.specs.paddle.width,
            self.surface.height * self.specs.paddle.height,
        )
    }

    pub fn left_paddle_center(&self, y: f32) -> Vec2 {
        self.point(Vec2::new(self.specs.paddle.collision_bounds.left, y))
    }

    pub fn right_paddle_center(&self, y: f32) -> Vec2 {
        self.point(Vec2::new(self.specs.paddle.collision_bounds.right, y))
    }

    /// Radius is a fraction of field width, so the ball scales with width
    pub fn ball_diameter(&self) -> f32 {
        self.surface.width * self.specs.ball.radius * 2.0
    }
}
