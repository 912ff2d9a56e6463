//! Keyboard input handling
//!
//! Key edges arrive from listeners; the render loop samples the held set once
//! per tick and sends at most one command.

use std::collections::HashSet;

use proto::C2S;

/// Movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `ArrowUp`/`w`/`W` move up, `ArrowDown`/`s`/`S` move down
    pub fn from_key(key: &str) -> Option<Self> {
        MoveKey::from_key(key).map(MoveKey::direction)
    }

    pub fn command(self) -> C2S {
        match self {
            Direction::Up => C2S::PaddleUp,
            Direction::Down => C2S::PaddleDown,
        }
    }
}

/// Physical movement key. `w`/`W` and `s`/`S` are one key each, so a Shift
/// change between press and release still releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MoveKey {
    ArrowUp,
    W,
    ArrowDown,
    S,
}

impl MoveKey {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(MoveKey::ArrowUp),
            "w" | "W" => Some(MoveKey::W),
            "ArrowDown" => Some(MoveKey::ArrowDown),
            "s" | "S" => Some(MoveKey::S),
            _ => None,
        }
    }

    fn direction(self) -> Direction {
        match self {
            MoveKey::ArrowUp | MoveKey::W => Direction::Up,
            MoveKey::ArrowDown | MoveKey::S => Direction::Down,
        }
    }
}

/// Set of held movement keys. A direction is held while any of its keys is.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: HashSet<MoveKey>,
    disabled: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. Returns true if the key is a movement key.
    pub fn press(&mut self, key: &str) -> bool {
        match MoveKey::from_key(key) {
            Some(k) => {
                if !self.disabled {
                    self.held.insert(k);
                }
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, key: &str) -> bool {
        match MoveKey::from_key(key) {
            Some(k) => {
                self.held.remove(&k);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held.iter().any(|k| k.direction() == direction)
    }

    /// Forget held keys (focus lost, so releases will never arrive)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Stop producing commands for good
    pub fn disable(&mut self) {
        self.disabled = true;
        self.clear();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Command for this tick. Up wins when both directions are held.
    pub fn sample(&self) -> Option<C2S> {
        if self.disabled {
            return None;
        }
        if self.is_held(Direction::Up) {
            Some(Direction::Up.command())
        } else if self.is_held(Direction::Down) {
            Some(Direction::Down.command())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        for key in ["ArrowUp", "w", "W"] {
            assert_eq!(Direction::from_key(key), Some(Direction::Up));
        }
        for key in ["ArrowDown", "s", "S"] {
            assert_eq!(Direction::from_key(key), Some(Direction::Down));
        }
        assert_eq!(Direction::from_key("a"), None);
        assert_eq!(Direction::Up.command().to_byte(), 0x01);
        assert_eq!(Direction::Down.command().to_byte(), 0x02);
    }

    #[test]
    fn test_held_key_repeats_every_sample() {
        let mut input = InputSampler::new();
        assert_eq!(input.sample(), None);
        input.press("s");
        assert_eq!(input.sample(), Some(C2S::PaddleDown));
        assert_eq!(input.sample(), Some(C2S::PaddleDown));
        input.release("s");
        assert_eq!(input.sample(), None);
    }

    #[test]
    fn test_up_wins_when_both_held() {
        let mut input = InputSampler::new();
        input.press("ArrowDown");
        input.press("ArrowUp");
        assert_eq!(input.sample(), Some(C2S::PaddleUp));
        input.release("ArrowUp");
        assert_eq!(input.sample(), Some(C2S::PaddleDown));
    }

    #[test]
    fn test_direction_held_while_any_key_is() {
        let mut input = InputSampler::new();
        input.press("ArrowUp");
        input.press("w");
        input.release("w");
        assert_eq!(input.sample(), Some(C2S::PaddleUp), "ArrowUp still held");
        input.release("ArrowUp");
        assert_eq!(input.sample(), None);
    }

    #[test]
    fn test_shifted_release_frees_key() {
        let mut input = InputSampler::new();
        input.press("s");
        input.release("S");
        assert_eq!(input.sample(), None);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut input = InputSampler::new();
        assert!(!input.press("Enter"));
        assert_eq!(input.sample(), None);
    }

    #[test]
    fn test_clear_and_disable() {
        let mut input = InputSampler::new();
        input.press("w");
        input.clear();
        assert_eq!(input.sample(), None);

        input.disable();
        input.press("w");
        assert_eq!(input.sample(), None);
        assert!(input.is_disabled());
    }
}
