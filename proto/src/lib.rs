//! Network protocol for Pong game
//!
//! Fixed-layout binary frames over the game WebSocket, plus the JSON
//! documents served over HTTP (`/specs`, `/games`).

mod specs;

pub use specs::*;

use thiserror::Error;

/// Tag byte of a game state frame
pub const TAG_STATE: u8 = 0x01;
/// Tag byte of a status frame
pub const TAG_STATUS: u8 = 0x02;
/// Tag byte of an assigned game id frame
pub const TAG_GAME_ID: u8 = 0x03;

/// Exact length of a game state frame, tag included
pub const STATE_FRAME_LEN: usize = 20;

// ============================================================================
// Snapshot types
// ============================================================================

/// Which side won the match, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winner {
    #[default]
    None,
    Left,
    Right,
}

impl Winner {
    /// Decode the winner byte. Unknown codes mean no winner.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Winner::Left,
            2 => Winner::Right,
            _ => Winner::None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Winner::None => 0,
            Winner::Left => 1,
            Winner::Right => 2,
        }
    }
}

/// Ball position, normalized to [0, 1] on both axes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BallPos {
    pub x: f32,
    pub y: f32,
}

/// Paddle centre y positions, normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Paddles {
    pub left: f32,
    pub right: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub left: u8,
    pub right: u8,
}

/// Authoritative game state snapshot. Replaced wholesale on every state frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameState {
    pub ball: BallPos,
    pub paddles: Paddles,
    pub score: Score,
    pub winner: Winner,
}

impl GameState {
    /// Encode as a state frame (tag included). The client never sends these;
    /// this exists for tooling and tests.
    pub fn to_frame(&self) -> [u8; STATE_FRAME_LEN] {
        let mut frame = [0u8; STATE_FRAME_LEN];
        frame[0] = TAG_STATE;
        frame[1..5].copy_from_slice(&self.ball.x.to_be_bytes());
        frame[5..9].copy_from_slice(&self.ball.y.to_be_bytes());
        frame[9..13].copy_from_slice(&self.paddles.left.to_be_bytes());
        frame[13..17].copy_from_slice(&self.paddles.right.to_be_bytes());
        frame[17] = self.score.left;
        frame[18] = self.score.right;
        frame[19] = self.winner.code();
        frame
    }

    fn from_frame(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() != STATE_FRAME_LEN {
            return Err(ProtocolError::StateLength {
                expected: STATE_FRAME_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            ball: BallPos {
                x: read_f32(bytes, 1),
                y: read_f32(bytes, 5),
            },
            paddles: Paddles {
                left: read_f32(bytes, 9),
                right: read_f32(bytes, 13),
            },
            score: Score {
                left: bytes[17],
                right: bytes[18],
            },
            winner: Winner::from_code(bytes[19]),
        })
    }
}

/// Big-endian f32 at `offset`. Caller has checked the length.
fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_be_bytes(raw)
}

// ============================================================================
// S2C Messages (Server to Client)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum S2C {
    /// Full game state snapshot (tag 1)
    GameState(GameState),

    /// Status code text, e.g. `game_in_progress` (tag 2)
    Status(String),

    /// Id of the game the server created for us (tag 3)
    GameId(String),
}

impl S2C {
    /// Decode one inbound frame.
    ///
    /// Returns `Ok(None)` for tags this client does not know about, so newer
    /// servers can add frame types without breaking older clients.
    pub fn from_bytes(bytes: &[u8]) -> Result<Option<Self>, ProtocolError> {
        let (&tag, _) = bytes.split_first().ok_or(ProtocolError::Empty)?;
        match tag {
            TAG_STATE => GameState::from_frame(bytes).map(|s| Some(S2C::GameState(s))),
            TAG_STATUS => read_text(bytes).map(|s| Some(S2C::Status(s))),
            TAG_GAME_ID => read_text(bytes).map(|s| Some(S2C::GameId(s))),
            _ => Ok(None),
        }
    }

    /// Encode as a frame. Text longer than 255 bytes is rejected.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        match self {
            S2C::GameState(state) => Ok(state.to_frame().to_vec()),
            S2C::Status(text) => write_text(TAG_STATUS, text),
            S2C::GameId(text) => write_text(TAG_GAME_ID, text),
        }
    }
}

/// Length-prefixed UTF-8 payload: byte 1 is N, bytes [2, 2+N) are the text.
fn read_text(bytes: &[u8]) -> Result<String, ProtocolError> {
    let len = *bytes.get(1).ok_or(ProtocolError::MissingLength)? as usize;
    let payload = bytes
        .get(2..2 + len)
        .ok_or(ProtocolError::TruncatedText {
            declared: len,
            available: bytes.len().saturating_sub(2),
        })?;
    String::from_utf8(payload.to_vec()).map_err(|_| ProtocolError::InvalidUtf8)
}

fn write_text(tag: u8, text: &str) -> Result<Vec<u8>, ProtocolError> {
    let len = u8::try_from(text.len()).map_err(|_| ProtocolError::TextTooLong(text.len()))?;
    let mut out = Vec::with_capacity(2 + text.len());
    out.push(tag);
    out.push(len);
    out.extend_from_slice(text.as_bytes());
    Ok(out)
}

// ============================================================================
// C2S Messages (Client to Server)
// ============================================================================

/// Paddle command. Sent as a single unframed byte, no payload, no ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum C2S {
    PaddleUp,
    PaddleDown,
}

impl C2S {
    pub fn to_byte(self) -> u8 {
        match self {
            C2S::PaddleUp => 0x01,
            C2S::PaddleDown => 0x02,
        }
    }

    pub fn to_bytes(self) -> [u8; 1] {
        [self.to_byte()]
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(C2S::PaddleUp),
            0x02 => Some(C2S::PaddleDown),
            _ => None,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A frame that could not be decoded. Recoverable: drop the frame, keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty frame")]
    Empty,
    #[error("state frame must be {expected} bytes, got {actual}")]
    StateLength { expected: usize, actual: usize },
    #[error("text frame is missing its length byte")]
    MissingLength,
    #[error("text frame declares {declared} bytes but only {available} follow")]
    TruncatedText { declared: usize, available: usize },
    #[error("text payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("text payload of {0} bytes does not fit a one-byte length")]
    TextTooLong(usize),
}
