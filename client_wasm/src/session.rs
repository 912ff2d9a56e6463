//! One game session: connection, input, and render loop together
//!
//! Host callbacks (socket events, key/pointer listeners, the frame callback)
//! all land here. Teardown order:
//! 1. stop the render loop and cancel the frame registration
//! 2. disable input and release the listeners
//! 3. close the connection

use game_core::SurfaceSize;
use glam::Vec2;

use crate::input::InputSampler;
use crate::network::{Connection, Transport};
use crate::render_loop::{Frame, RenderLoop};

/// Registrations the host holds on the session's behalf
pub trait FrameHost {
    /// Stop scheduling frame callbacks
    fn cancel_frames(&mut self);
    /// Remove keyboard, pointer, blur, and resize listeners
    fn release_listeners(&mut self);
}

pub struct Session<T: Transport> {
    connection: Connection<T>,
    input: InputSampler,
    render: RenderLoop,
    torn_down: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(connection: Connection<T>, render: RenderLoop) -> Self {
        Self {
            connection,
            input: InputSampler::new(),
            render,
            torn_down: false,
        }
    }

    pub fn connection(&self) -> &Connection<T> {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection<T> {
        &mut self.connection
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Returns true if the key moves a paddle (host should prevent default)
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.press(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.release(key)
    }

    pub fn blur(&mut self) {
        self.input.clear();
    }

    pub fn pointer_down(&mut self, at: Vec2) {
        self.render.spawn_effect(at);
    }

    pub fn resize(&mut self, container: SurfaceSize) -> SurfaceSize {
        self.render.resize(container)
    }

    /// One display frame
    pub fn tick(&mut self) -> Option<Frame> {
        let Self {
            connection,
            input,
            render,
            ..
        } = self;
        let snapshot = connection.snapshot().latest();
        render.tick(input, snapshot, |cmd| connection.send(cmd))
    }

    /// Deterministic shutdown. Safe to call more than once.
    pub fn teardown(&mut self, host: &mut dyn FrameHost) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.render.stop();
        host.cancel_frames();

        self.input.disable();
        host.release_listeners();

        self.connection.close();
        tracing::info!("session torn down");
    }
}
