//! Connection State Machine
//!
//! One instance per socket. States only move forward:
//! `Connecting -> Connected -> Disconnected`, or into `Errored` from either
//! live state. Once terminal, a new connection must be built to retry.

use thiserror::Error;

/// Close code for a normal closure
pub const NORMAL_CLOSURE: u16 = 1000;

const REASON_ROOM_NOT_FOUND: &str = "Game room not found";
const REASON_ROOM_FULL: &str = "Room is full";

/// Why a join failed. Always terminal for the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("generic failure")]
    Generic,
    #[error("room not found")]
    RoomNotFound,
    #[error("room full")]
    RoomFull,
}

impl ConnectError {
    /// Recognised server rejections: normal closure with an exact reason text
    pub fn from_close(code: u16, reason: &str) -> Option<Self> {
        if code != NORMAL_CLOSURE {
            return None;
        }
        match reason {
            REASON_ROOM_NOT_FOUND => Some(ConnectError::RoomNotFound),
            REASON_ROOM_FULL => Some(ConnectError::RoomFull),
            _ => None,
        }
    }
}

/// Connection states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Errored(ConnectError),
}

impl ConnectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConnectionState::Disconnected | ConnectionState::Errored(_)
        )
    }
}

/// Socket-level happenings that drive transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Socket opened
    Opened,
    /// Transport error
    Failed,
    /// Socket closed by the peer or the network
    Closed { code: u16, reason: String },
    /// Caller asked to close
    LocalClose,
}

/// Result of a state transition
#[derive(Debug, Clone)]
pub struct TransitionResult {
    pub success: bool,
    pub from_state: ConnectionState,
    pub to_state: ConnectionState,
    pub action: ConnectionAction,
}

/// Connection Finite State Machine
#[derive(Debug)]
pub struct ConnectionFsm {
    state: ConnectionState,
}

impl ConnectionFsm {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Connecting,
        }
    }

    /// Get current state
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Get current state as string (for JS interop)
    pub fn state_string(&self) -> String {
        match &self.state {
            ConnectionState::Errored(e) => format!("Errored({})", e),
            other => format!("{:?}", other),
        }
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: &ConnectionAction) -> bool {
        self.get_next_state(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: ConnectionAction) -> TransitionResult {
        let from_state = self.state.clone();

        if let Some(next_state) = self.get_next_state(&action) {
            self.state = next_state.clone();
            TransitionResult {
                success: true,
                from_state,
                to_state: next_state,
                action,
            }
        } else {
            TransitionResult {
                success: false,
                to_state: from_state.clone(),
                from_state,
                action,
            }
        }
    }

    /// Get next state for a given action (if valid)
    fn get_next_state(&self, action: &ConnectionAction) -> Option<ConnectionState> {
        use ConnectionAction as A;
        use ConnectionState as S;

        match (&self.state, action) {
            // From Connecting
            (S::Connecting, A::Opened) => Some(S::Connected),
            (S::Connecting, A::Failed) => Some(S::Errored(ConnectError::Generic)),
            (S::Connecting, A::Closed { code, reason }) => Some(S::Errored(
                ConnectError::from_close(*code, reason).unwrap_or(ConnectError::Generic),
            )),
            (S::Connecting, A::LocalClose) => Some(S::Disconnected),

            // From Connected. The server accepts the socket before it
            // rejects a join, so rejections can arrive here too.
            (S::Connected, A::Closed { code, reason }) => Some(
                ConnectError::from_close(*code, reason)
                    .map(S::Errored)
                    .unwrap_or(S::Disconnected),
            ),
            (S::Connected, A::LocalClose) => Some(S::Disconnected),

            // Errors after open are followed by a close, which decides.
            // Terminal states accept nothing.
            _ => None,
        }
    }
}

impl Default for ConnectionFsm {
    fn default() -> Self {
        Self::new()
    }
}
