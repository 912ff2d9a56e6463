//! Latest-snapshot slot shared between the socket callback and the render tick

use std::cell::Cell;
use std::rc::Rc;

use proto::GameState;

/// Single-writer, single-reader snapshot slot. Last write wins; nothing is
/// buffered, so a tick always sees the most recent frame.
#[derive(Clone, Debug, Default)]
pub struct SnapshotCell {
    latest: Rc<Cell<Option<GameState>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot
    pub fn set(&self, state: GameState) {
        self.latest.set(Some(state));
    }

    /// Most recent snapshot, if any has arrived
    pub fn latest(&self) -> Option<GameState> {
        self.latest.get()
    }
}
