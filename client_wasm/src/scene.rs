//! Frame contents as instanced shapes in surface pixels
//!
//! Pure geometry; the renderer only uploads what this produces. Origin is the
//! top-left corner, y grows downward.

use game_core::{FieldPositions, Params, Projection, Sprite, SurfaceSize};
use glam::Vec2;
use proto::{GameSpecs, Score};

/// Instance data for rendering (matches shader InstanceInput).
/// Must use `repr(C)` and `bytemuck` to cast to raw bytes for the GPU buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub transform: [f32; 4], // center x, center y, width, height
    pub tint: [f32; 4],      // rgba
}

impl InstanceData {
    pub fn new(center: Vec2, size: Vec2, tint: [f32; 4]) -> Self {
        Self {
            transform: [center.x, center.y, size.x, size.y],
            tint,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.transform[0], self.transform[1])
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.transform[2], self.transform[3])
    }
}

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Shapes to draw this frame, one instance list per mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Drawn with the unit quad
    pub rects: Vec<InstanceData>,
    /// Drawn with the unit circle
    pub circles: Vec<InstanceData>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full frame. `score` is `None` until the first snapshot arrives, which
    /// leaves the scoreboard out.
    pub fn build(
        specs: &GameSpecs,
        surface: SurfaceSize,
        positions: &FieldPositions,
        score: Option<Score>,
        sprites: &[Sprite],
    ) -> Self {
        let mut scene = Scene::new();
        if surface.is_empty() {
            return scene;
        }
        let proj = Projection::new(surface, specs);

        scene.push_center_line(surface);
        scene.push_paddles(&proj, positions);
        scene.push_ball(&proj, positions.ball);
        scene.push_particles(sprites);
        if let Some(score) = score {
            scene.push_score(surface, score);
        }
        scene
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty() && self.circles.is_empty()
    }

    pub fn instance_count(&self) -> usize {
        self.rects.len() + self.circles.len()
    }

    pub fn push_center_line(&mut self, surface: SurfaceSize) {
        let SurfaceSize { width, height } = surface;
        let spacing = height * Params::CENTER_DASH_SPACING;
        let length = height * Params::CENTER_DASH_LENGTH;
        if !(spacing > 0.0) {
            return;
        }
        let thickness = (width * Params::CENTER_LINE_WIDTH).max(1.0);
        let tint = [1.0, 1.0, 1.0, Params::CENTER_LINE_ALPHA];

        let mut y = 0.0;
        while y < height {
            self.rects.push(InstanceData::new(
                Vec2::new(width / 2.0, y + length / 2.0),
                Vec2::new(thickness, length),
                tint,
            ));
            y += spacing;
        }
    }

    pub fn push_paddles(&mut self, proj: &Projection, positions: &FieldPositions) {
        let size = proj.paddle_size();
        self.rects.push(InstanceData::new(
            proj.left_paddle_center(positions.left_paddle_y),
            size,
            WHITE,
        ));
        self.rects.push(InstanceData::new(
            proj.right_paddle_center(positions.right_paddle_y),
            size,
            WHITE,
        ));
    }

    pub fn push_ball(&mut self, proj: &Projection, ball: Vec2) {
        let d = proj.ball_diameter();
        self.circles
            .push(InstanceData::new(proj.point(ball), Vec2::splat(d), WHITE));
    }

    pub fn push_particles(&mut self, sprites: &[Sprite]) {
        self.circles.extend(
            sprites
                .iter()
                .map(|s| InstanceData::new(s.pos, Vec2::splat(s.radius * 2.0), s.color)),
        );
    }

    pub fn push_score(&mut self, surface: SurfaceSize, score: Score) {
        let font = score_font_size(surface.width);
        let y = font * 1.5;
        self.push_number(score.left, Vec2::new(surface.width * 0.25, y), font);
        self.push_number(score.right, Vec2::new(surface.width * 0.75, y), font);
    }

    /// Seven-segment number centred on `center`, `font` pixels tall
    pub fn push_number(&mut self, value: u8, center: Vec2, font: f32) {
        let glyph = DigitGlyph::new(font);
        let digits = value.to_string();
        let count = digits.len() as f32;
        let total = count * glyph.width + (count - 1.0) * glyph.gap;

        let mut x = center.x - total / 2.0;
        let top = center.y - font / 2.0;
        for ch in digits.chars() {
            if let Some(d) = ch.to_digit(10) {
                glyph.push(self, d as usize, Vec2::new(x, top));
            }
            x += glyph.width + glyph.gap;
        }
    }
}

/// Scoreboard glyph height for a surface width
pub fn score_font_size(surface_width: f32) -> f32 {
    (surface_width * Params::SCORE_FONT_SCALE).clamp(Params::SCORE_FONT_MIN, Params::SCORE_FONT_MAX)
}

// Segments a..g as bits 0..6
const SEGMENTS: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

#[derive(Debug, Clone, Copy)]
struct DigitGlyph {
    height: f32,
    width: f32,
    thickness: f32,
    gap: f32,
}

impl DigitGlyph {
    fn new(height: f32) -> Self {
        Self {
            height,
            width: height * 0.55,
            thickness: height * 0.12,
            gap: height * 0.25,
        }
    }

    /// Segment rects for digit `d` with its top-left corner at `origin`
    fn push(&self, scene: &mut Scene, d: usize, origin: Vec2) {
        let Some(&mask) = SEGMENTS.get(d) else {
            return;
        };
        let (w, h, t) = (self.width, self.height, self.thickness);
        let horizontal = Vec2::new(w, t);
        let vertical = Vec2::new(t, h / 2.0);

        let segments = [
            (Vec2::new(w / 2.0, t / 2.0), horizontal),          // a
            (Vec2::new(w - t / 2.0, h / 4.0), vertical),        // b
            (Vec2::new(w - t / 2.0, h * 0.75), vertical),       // c
            (Vec2::new(w / 2.0, h - t / 2.0), horizontal),      // d
            (Vec2::new(t / 2.0, h * 0.75), vertical),           // e
            (Vec2::new(t / 2.0, h / 4.0), vertical),            // f
            (Vec2::new(w / 2.0, h / 2.0), horizontal),          // g
        ];
        for (bit, (offset, size)) in segments.into_iter().enumerate() {
            if mask & (1 << bit) != 0 {
                scene
                    .rects
                    .push(InstanceData::new(origin + offset, size, WHITE));
            }
        }
    }
}
