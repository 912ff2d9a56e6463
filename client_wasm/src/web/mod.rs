//! Browser glue (wasm32 only)

pub mod client;
pub mod host;
pub mod http;
pub mod sink;
pub mod socket;

pub use client::{fetch_games, start_game, PongClient};
