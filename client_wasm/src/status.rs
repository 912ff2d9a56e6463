//! Server status codes and what to show for them

use proto::Winner;

use crate::identity::IdentityProvider;

const GAME_OVER_PREFIX: &str = "game_over";

/// Status codes sent in tag-2 frames. Unknown codes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCode {
    WaitingForPlayers,
    GameStarting,
    GameInProgress,
    GamePaused,
    GameOverLeft,
    GameOverRight,
    Unknown(String),
}

impl StatusCode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "waiting_for_players" => StatusCode::WaitingForPlayers,
            "game_starting" => StatusCode::GameStarting,
            "game_in_progress" => StatusCode::GameInProgress,
            "game_paused" => StatusCode::GamePaused,
            "game_over_left" => StatusCode::GameOverLeft,
            "game_over_right" => StatusCode::GameOverRight,
            other => StatusCode::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusCode::WaitingForPlayers => "waiting_for_players",
            StatusCode::GameStarting => "game_starting",
            StatusCode::GameInProgress => "game_in_progress",
            StatusCode::GamePaused => "game_paused",
            StatusCode::GameOverLeft => "game_over_left",
            StatusCode::GameOverRight => "game_over_right",
            StatusCode::Unknown(text) => text,
        }
    }

    /// Text shown to the player
    pub fn display_text(&self) -> &str {
        match self {
            StatusCode::WaitingForPlayers => "Waiting for opponent...",
            StatusCode::GameStarting => "Game starting in 3...",
            StatusCode::GameInProgress => "Game in progress",
            StatusCode::GamePaused => "Game paused - waiting for player",
            StatusCode::GameOverLeft => "Game Over - Left player wins!",
            StatusCode::GameOverRight => "Game Over - Right player wins!",
            StatusCode::Unknown(text) => text,
        }
    }

    pub fn winner(&self) -> Winner {
        match self {
            StatusCode::GameOverLeft => Winner::Left,
            StatusCode::GameOverRight => Winner::Right,
            _ => Winner::None,
        }
    }
}

/// What the UI should show for a status
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayIntent {
    /// `None` for connection-level intents the server never sent
    pub code: Option<StatusCode>,
    pub text: String,
    /// Raw status started with `game_over`, including unknown variants
    pub game_over: bool,
    pub winner: Winner,
}

impl DisplayIntent {
    pub fn connecting() -> Self {
        Self::plain("Connecting...")
    }

    pub fn connected() -> Self {
        Self::plain("Connected")
    }

    pub fn disconnected() -> Self {
        Self::plain("Disconnected")
    }

    fn plain(text: &str) -> Self {
        Self {
            code: None,
            text: text.to_string(),
            game_over: false,
            winner: Winner::None,
        }
    }
}

/// Map a raw status to its display intent. A `game_over*` status also forgets
/// the remembered current game; repeated frames clear it again harmlessly.
pub fn map_status(raw: &str, identity: &mut dyn IdentityProvider) -> DisplayIntent {
    let code = StatusCode::parse(raw);
    let game_over = raw.starts_with(GAME_OVER_PREFIX);
    if game_over {
        tracing::debug!(status = raw, "game over, clearing current game");
        identity.clear_current_game();
    }
    DisplayIntent {
        text: code.display_text().to_string(),
        winner: code.winner(),
        game_over,
        code: Some(code),
    }
}
