//! Connection manager: one socket, one state machine, typed events
//!
//! The browser socket lives behind [`Transport`]; socket callbacks call the
//! `handle_*` methods. Everything here is synchronous and runs on the single
//! event-loop thread.

use proto::{GameState, ProtocolError, C2S, S2C};
use thiserror::Error;

use crate::fsm::{ConnectError, ConnectionAction, ConnectionFsm, ConnectionState};
use crate::identity::IdentityProvider;
use crate::state::SnapshotCell;
use crate::status::{map_status, DisplayIntent};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("send failed: {0}")]
    Send(String),
}

/// Outbound half of a socket
pub trait Transport {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), TransportError>;
    fn close(&self);
}

/// One handler per event kind. Unhandled kinds default to no-ops.
pub trait EventSink {
    fn on_connect(&mut self) {}
    fn on_connect_error(&mut self, _error: &ConnectError) {}
    fn on_disconnect(&mut self) {}
    fn on_state(&mut self, _state: &GameState) {}
    fn on_status(&mut self, _intent: &DisplayIntent) {}
    fn on_game_id(&mut self, _id: &str) {}
}

pub struct Connection<T: Transport> {
    transport: T,
    fsm: ConnectionFsm,
    snapshot: SnapshotCell,
    sink: Box<dyn EventSink>,
    identity: Box<dyn IdentityProvider>,
    requested_room: Option<String>,
    dropped_frames: u64,
    released: bool,
}

impl<T: Transport> Connection<T> {
    /// `requested_room` is the room id sent in the URL, `None` for a new game
    pub fn new(
        transport: T,
        snapshot: SnapshotCell,
        sink: Box<dyn EventSink>,
        identity: Box<dyn IdentityProvider>,
        requested_room: Option<String>,
    ) -> Self {
        Self {
            transport,
            fsm: ConnectionFsm::new(),
            snapshot,
            sink,
            identity,
            requested_room,
            dropped_frames: 0,
            released: false,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        self.fsm.state()
    }

    pub fn state_string(&self) -> String {
        self.fsm.state_string()
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.fsm.state(), ConnectionState::Connected)
    }

    pub fn snapshot(&self) -> &SnapshotCell {
        &self.snapshot
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// Frames dropped as malformed
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn handle_open(&mut self) {
        if self.apply(ConnectionAction::Opened) {
            self.sink.on_connect();
        }
    }

    pub fn handle_error(&mut self) {
        if !self.apply(ConnectionAction::Failed) {
            tracing::debug!(state = %self.fsm.state_string(), "transport error ignored");
        }
    }

    pub fn handle_close(&mut self, code: u16, reason: &str) {
        self.apply(ConnectionAction::Closed {
            code,
            reason: reason.to_string(),
        });
    }

    /// Decode and route one inbound frame. A malformed frame is dropped and
    /// reported; nothing else changes.
    pub fn handle_message(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        if !self.is_connected() {
            tracing::trace!(len = bytes.len(), "frame ignored while not connected");
            return Ok(());
        }
        let msg = match S2C::from_bytes(bytes) {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                tracing::debug!(tag = ?bytes.first(), "unknown frame tag ignored");
                return Ok(());
            }
            Err(e) => {
                self.dropped_frames += 1;
                tracing::warn!(error = %e, len = bytes.len(), "dropping malformed frame");
                return Err(e);
            }
        };

        match msg {
            S2C::GameState(state) => {
                self.snapshot.set(state);
                self.sink.on_state(&state);
            }
            S2C::Status(raw) => {
                let intent = map_status(&raw, self.identity.as_mut());
                tracing::debug!(status = %raw, "status");
                self.sink.on_status(&intent);
            }
            S2C::GameId(id) => {
                if self.requested_room.is_none() {
                    tracing::info!(game_id = %id, "assigned game");
                    self.identity.set_current_game(&id);
                    self.sink.on_game_id(&id);
                } else {
                    tracing::debug!(game_id = %id, "game id ignored, room was requested");
                }
            }
        }
        Ok(())
    }

    /// Fire-and-forget. Ignored unless connected.
    pub fn send(&mut self, cmd: C2S) {
        if !self.is_connected() {
            return;
        }
        if let Err(e) = self.transport.send_bytes(&cmd.to_bytes()) {
            tracing::warn!(error = %e, ?cmd, "dropping command");
        }
    }

    /// Close from our side. No event is emitted. Safe to call repeatedly.
    ///
    /// The transport is released on the first call whatever the state, so a
    /// connection that already failed still drops its socket handlers.
    pub fn close(&mut self) {
        self.apply(ConnectionAction::LocalClose);
        if !self.released {
            self.released = true;
            self.transport.close();
        }
    }

    /// Run a transition and emit the event for the state it lands in
    fn apply(&mut self, action: ConnectionAction) -> bool {
        let local = action == ConnectionAction::LocalClose;
        let result = self.fsm.transition(action);
        if !result.success {
            return false;
        }
        tracing::info!(
            from = ?result.from_state,
            to = ?result.to_state,
            "connection transition"
        );
        if local {
            return true;
        }
        match &result.to_state {
            ConnectionState::Errored(e) => self.sink.on_connect_error(e),
            ConnectionState::Disconnected => self.sink.on_disconnect(),
            ConnectionState::Connecting | ConnectionState::Connected => {}
        }
        true
    }
}
