//! Browser client for two-player networked Pong
//!
//! The connection manager, status mapping, input sampling, render loop, and
//! scene building are plain Rust and tested on the host. The WebSocket,
//! `requestAnimationFrame`, DOM listeners, and the WebGPU renderer only build
//! for `wasm32`.

pub mod camera;
pub mod config;
pub mod fsm;
pub mod identity;
pub mod input;
pub mod mesh;
pub mod network;
pub mod render_loop;
pub mod scene;
pub mod session;
pub mod state;
pub mod status;

#[cfg(target_arch = "wasm32")]
pub mod logging;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod tests;

pub use config::{ClientConfig, ConfigError};
pub use fsm::{ConnectError, ConnectionState};
pub use identity::{IdentityProvider, MemoryIdentity};
pub use input::InputSampler;
pub use network::{Connection, EventSink, Transport, TransportError};
pub use render_loop::{Frame, RenderLoop};
pub use session::{FrameHost, Session};
pub use state::SnapshotCell;
pub use status::{map_status, DisplayIntent, StatusCode};
