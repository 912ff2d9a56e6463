//! Client configuration and endpoint URLs

use std::net::IpAddr;

use thiserror::Error;
use url::{Host, Url};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("server address is empty")]
    EmptyServer,
    #[error("invalid server address {0:?}")]
    InvalidServer(String),
    #[error("player name is empty")]
    EmptyPlayerName,
}

/// Where to connect and as whom
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// `host[:port]`, no scheme
    pub server: String,
    pub player_name: String,
    /// `None` asks the server for a new game
    pub room_id: Option<String>,
    pub effects_enabled: bool,
}

impl ClientConfig {
    pub fn new(server: &str, player_name: &str, room_id: Option<&str>) -> Result<Self, ConfigError> {
        let server = server.trim();
        if server.is_empty() {
            return Err(ConfigError::EmptyServer);
        }
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(ConfigError::EmptyPlayerName);
        }
        let config = Self {
            server: server.to_string(),
            player_name: player_name.to_string(),
            room_id: room_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            effects_enabled: true,
        };
        // Fail early on anything the URL parser would reject later
        config.base_url(false)?;
        Ok(config)
    }

    pub fn with_effects(mut self, enabled: bool) -> Self {
        self.effects_enabled = enabled;
        self
    }

    /// Unencrypted transport is only used for local hosts
    pub fn is_secure(&self) -> bool {
        !is_local_host(&self.server)
    }

    /// `<ws|wss>://<server>/game?player_name=..[&room_id=..]`
    pub fn game_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.base_url(true)?;
        url.set_path("/game");
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("player_name", &self.player_name);
            if let Some(room) = &self.room_id {
                query.append_pair("room_id", room);
            }
        }
        Ok(url)
    }

    /// `<http|https>://<server>/specs`
    pub fn specs_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.base_url(false)?;
        url.set_path("/specs");
        Ok(url)
    }

    /// `<http|https>://<server>/games`
    pub fn games_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.base_url(false)?;
        url.set_path("/games");
        Ok(url)
    }

    fn base_url(&self, websocket: bool) -> Result<Url, ConfigError> {
        let scheme = match (websocket, self.is_secure()) {
            (true, true) => "wss",
            (true, false) => "ws",
            (false, true) => "https",
            (false, false) => "http",
        };
        let url = Url::parse(&format!("{}://{}", scheme, self.server))
            .map_err(|_| ConfigError::InvalidServer(self.server.clone()))?;
        if url.host().is_none() || url.path() != "/" || url.query().is_some() {
            return Err(ConfigError::InvalidServer(self.server.clone()));
        }
        Ok(url)
    }
}

/// `localhost`, `*.localhost`, or a loopback address, with or without a port
pub fn is_local_host(server: &str) -> bool {
    let Ok(url) = Url::parse(&format!("http://{}", server.trim())) else {
        return false;
    };
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
        None => false,
    }
}
