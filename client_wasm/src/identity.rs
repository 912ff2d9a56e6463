//! Player identity and the remembered current game
//!
//! Injected into the connection instead of read from globals, so tests can
//! count calls and the browser build can persist to `localStorage`.

/// Get/set access to the persisted identity
pub trait IdentityProvider {
    fn player_name(&self) -> Option<String>;
    fn set_player_name(&mut self, name: &str);
    fn current_game(&self) -> Option<String>;
    fn set_current_game(&mut self, id: &str);
    /// Forget the current game. Must be safe to call when nothing is stored.
    fn clear_current_game(&mut self);
}

/// In-memory identity for the host build and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentity {
    player_name: Option<String>,
    current_game: Option<String>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player_name(name: &str) -> Self {
        Self {
            player_name: Some(name.to_string()),
            current_game: None,
        }
    }
}

impl IdentityProvider for MemoryIdentity {
    fn player_name(&self) -> Option<String> {
        self.player_name.clone()
    }

    fn set_player_name(&mut self, name: &str) {
        self.player_name = Some(name.to_string());
    }

    fn current_game(&self) -> Option<String> {
        self.current_game.clone()
    }

    fn set_current_game(&mut self, id: &str) {
        self.current_game = Some(id.to_string());
    }

    fn clear_current_game(&mut self) {
        self.current_game = None;
    }
}

/// Name to join with: `given` unless blank, else the remembered one
pub fn resolve_player_name(given: &str, identity: &dyn IdentityProvider) -> String {
    let given = given.trim();
    if !given.is_empty() {
        return given.to_string();
    }
    identity
        .player_name()
        .map(|name| name.trim().to_string())
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorageIdentity;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::IdentityProvider;
    use web_sys::Storage;

    const KEY_PLAYER_NAME: &str = "playerName";
    const KEY_CURRENT_GAME: &str = "currentGameId";

    /// Identity persisted in `window.localStorage`. Storage failures (private
    /// browsing, quota) are logged and otherwise ignored.
    pub struct LocalStorageIdentity {
        storage: Option<Storage>,
    }

    impl LocalStorageIdentity {
        pub fn new() -> Self {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
            if storage.is_none() {
                tracing::warn!("localStorage unavailable, identity will not persist");
            }
            Self { storage }
        }

        fn get(&self, key: &str) -> Option<String> {
            self.storage.as_ref()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) {
            if let Some(storage) = &self.storage {
                if storage.set_item(key, value).is_err() {
                    tracing::warn!(key, "failed to write localStorage");
                }
            }
        }

        fn remove(&self, key: &str) {
            if let Some(storage) = &self.storage {
                let _ = storage.remove_item(key);
            }
        }
    }

    impl Default for LocalStorageIdentity {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdentityProvider for LocalStorageIdentity {
        fn player_name(&self) -> Option<String> {
            self.get(KEY_PLAYER_NAME)
        }

        fn set_player_name(&mut self, name: &str) {
            self.set(KEY_PLAYER_NAME, name);
        }

        fn current_game(&self) -> Option<String> {
            self.get(KEY_CURRENT_GAME)
        }

        fn set_current_game(&mut self, id: &str) {
            self.set(KEY_CURRENT_GAME, id);
        }

        fn clear_current_game(&mut self) {
            self.remove(KEY_CURRENT_GAME);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_identity() {
        let mut id = MemoryIdentity::with_player_name("ada");
        assert_eq!(id.player_name().as_deref(), Some("ada"));
        assert_eq!(id.current_game(), None);

        id.set_current_game("abc");
        assert_eq!(id.current_game().as_deref(), Some("abc"));

        id.clear_current_game();
        id.clear_current_game();
        assert_eq!(id.current_game(), None);
    }

    #[test]
    fn test_blank_name_falls_back_to_stored() {
        let id = MemoryIdentity::with_player_name("ada");
        assert_eq!(resolve_player_name("  ", &id), "ada");
        assert_eq!(resolve_player_name(" bob ", &id), "bob");
        assert_eq!(resolve_player_name("", &MemoryIdentity::new()), "");
    }
}
