//! JSON documents served over HTTP

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed playing-field description from `GET /specs`.
/// Loaded once per session, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSpecs {
    pub ball: BallSpecs,
    pub paddle: PaddleSpecs,
    pub game: FieldSpecs,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSpecs {
    /// Radius as a fraction of field width
    pub radius: f32,
    pub initial: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleInitial {
    pub y: f32,
}

/// Paddle x positions (fraction of field width) used for collisions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBounds {
    pub left: f32,
    pub right: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleSpecs {
    /// Height as a fraction of field height
    pub height: f32,
    /// Width as a fraction of field width. Older servers omit it.
    #[serde(default = "default_paddle_width")]
    pub width: f32,
    pub initial: PaddleInitial,
    pub collision_bounds: CollisionBounds,
}

fn default_paddle_width() -> f32 {
    0.02
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSpecs {
    pub points_to_win: u8,
    pub bounds: Bounds,
}

impl GameSpecs {
    /// Parse and validate a `/specs` document
    pub fn from_json(json: &str) -> Result<Self, SpecsError> {
        let specs: GameSpecs = serde_json::from_str(json)?;
        specs.validate()?;
        Ok(specs)
    }

    pub fn validate(&self) -> Result<(), SpecsError> {
        let Bounds { width, height } = self.game.bounds;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(SpecsError::InvalidBounds { width, height });
        }
        Ok(())
    }

    /// Width over height of the playing field
    pub fn aspect_ratio(&self) -> f32 {
        self.game.bounds.width / self.game.bounds.height
    }
}

impl Default for GameSpecs {
    /// Values served by the reference server
    fn default() -> Self {
        Self {
            ball: BallSpecs {
                radius: 0.02,
                initial: Point { x: 0.5, y: 0.5 },
            },
            paddle: PaddleSpecs {
                height: 0.2,
                width: default_paddle_width(),
                initial: PaddleInitial { y: 0.5 },
                collision_bounds: CollisionBounds {
                    left: 0.05,
                    right: 0.95,
                },
            },
            game: FieldSpecs {
                points_to_win: 5,
                bounds: Bounds {
                    width: 1.0,
                    height: 1.0,
                },
            },
        }
    }
}

/// One entry of the `GET /games` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: String,
    pub state: String,
    pub player_count: u8,
    pub left_score: u8,
    pub right_score: u8,
    pub winner: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub fn parse_game_list(json: &str) -> Result<Vec<GameSummary>, SpecsError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Debug, Error)]
pub enum SpecsError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("field bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}
