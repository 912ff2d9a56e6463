//! JavaScript entry points

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use game_core::{effects_for, Config, SurfaceSize};
use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

use super::host::{BrowserHost, FrameLoop};
use super::http::{self, to_js};
use super::sink::{flush, EventQueue, JsCallbacks, QueueSink};
use super::socket::{SocketCallbacks, SocketHandlers, WsTransport};
use crate::config::ClientConfig;
use crate::identity::{resolve_player_name, IdentityProvider, LocalStorageIdentity};
use crate::network::Connection;
use crate::render_loop::RenderLoop;
use crate::renderer::Renderer;
use crate::session::Session;
use crate::state::SnapshotCell;
use crate::status::DisplayIntent;

use super::sink::ClientEvent;

struct Inner {
    session: RefCell<Session<WsTransport>>,
    renderer: RefCell<Renderer>,
    host: RefCell<BrowserHost>,
    canvas: HtmlCanvasElement,
    container: HtmlElement,
    events: EventQueue,
    callbacks: JsCallbacks,
    socket_handlers: RefCell<Option<SocketHandlers>>,
}

impl Inner {
    /// Run `f` on the session unless it is already borrowed further up the
    /// stack, then deliver queued events.
    fn with_session(&self, f: impl FnOnce(&mut Session<WsTransport>)) {
        match self.session.try_borrow_mut() {
            Ok(mut session) => f(&mut session),
            Err(_) => tracing::warn!("session busy, event dropped"),
        }
        flush(&self.events, &self.callbacks);
    }

    fn container_size(&self) -> SurfaceSize {
        SurfaceSize::new(
            self.container.client_width() as f32,
            self.container.client_height() as f32,
        )
    }

    fn frame(&self) {
        let frame = match self.session.try_borrow_mut() {
            Ok(mut session) => session.tick(),
            Err(_) => None,
        };
        if let Some(frame) = frame {
            if let Ok(mut renderer) = self.renderer.try_borrow_mut() {
                if frame.resized {
                    let (w, h) = (frame.surface.width.round() as u32, frame.surface.height.round() as u32);
                    self.canvas.set_width(w);
                    self.canvas.set_height(h);
                    let style = self.canvas.style();
                    let _ = style.set_property("width", &format!("{}px", frame.surface.width));
                    let _ = style.set_property("height", &format!("{}px", frame.surface.height));
                    renderer.resize(w, h);
                }
                if let Err(e) = renderer.draw(&frame.scene) {
                    tracing::error!(error = %e, "draw failed");
                }
            }
        }
        flush(&self.events, &self.callbacks);
    }
}

/// A running game: socket, input listeners, and the frame loop
#[wasm_bindgen]
pub struct PongClient {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl PongClient {
    /// Stop the loop, drop listeners, close the socket. Safe to call twice.
    pub fn destroy(&self) {
        {
            let (Ok(mut session), Ok(mut host)) = (
                self.inner.session.try_borrow_mut(),
                self.inner.host.try_borrow_mut(),
            ) else {
                tracing::warn!("destroy while busy, ignored");
                return;
            };
            session.teardown(&mut *host);
        }
        self.inner.events.borrow_mut().clear();
    }

    #[wasm_bindgen(js_name = connectionState)]
    pub fn connection_state(&self) -> String {
        self.inner
            .session
            .try_borrow()
            .map(|s| s.connection().state_string())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = droppedFrames)]
    pub fn dropped_frames(&self) -> f64 {
        self.inner
            .session
            .try_borrow()
            .map(|s| s.connection().dropped_frames() as f64)
            .unwrap_or(0.0)
    }
}

impl Drop for PongClient {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Connect to a game and start drawing into `canvas`, sized to fit
/// `container`. `room_id` of `undefined` asks the server for a new game; a
/// blank `player_name` reuses the one remembered from last time.
/// `callbacks` may also carry `effects: false` to turn particles off.
#[wasm_bindgen(js_name = startGame)]
pub async fn start_game(
    canvas: HtmlCanvasElement,
    container: HtmlElement,
    server: String,
    player_name: String,
    room_id: Option<String>,
    callbacks: JsValue,
) -> Result<PongClient, JsValue> {
    crate::logging::init(tracing::Level::INFO);

    let effects = js_sys::Reflect::get(&callbacks, &JsValue::from_str("effects"))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    let mut identity = LocalStorageIdentity::new();
    let player_name = resolve_player_name(&player_name, &identity);
    let config = ClientConfig::new(&server, &player_name, room_id.as_deref())
        .map_err(to_js)?
        .with_effects(effects);
    let callbacks = JsCallbacks::from_object(&callbacks);
    let events: EventQueue = Rc::new(RefCell::new(VecDeque::new()));
    events
        .borrow_mut()
        .push_back(ClientEvent::Status(DisplayIntent::connecting()));

    let specs = http::fetch_specs(&config).await?;
    let renderer = Renderer::new(canvas.clone()).await.map_err(to_js)?;

    identity.set_player_name(&config.player_name);

    let url = config.game_url().map_err(to_js)?;
    tracing::info!(%url, "connecting");
    let transport = WsTransport::open(url.as_str())?;
    let ws = transport.socket().clone();

    let connection = Connection::new(
        transport,
        SnapshotCell::new(),
        Box::new(QueueSink::new(events.clone())),
        Box::new(identity),
        config.room_id.clone(),
    );
    let effects = effects_for(
        Config {
            effects_enabled: config.effects_enabled,
            ..Config::new()
        },
        js_sys::Date::now() as u64,
    );
    let container_size = SurfaceSize::new(
        container.client_width() as f32,
        container.client_height() as f32,
    );
    let render = RenderLoop::new(specs, effects, container_size);

    let inner = Rc::new(Inner {
        session: RefCell::new(Session::new(connection, render)),
        renderer: RefCell::new(renderer),
        host: RefCell::new(BrowserHost::default()),
        canvas,
        container,
        events,
        callbacks,
        socket_handlers: RefCell::new(None),
    });

    // From here on the socket is live: an early return drops `client`, whose
    // Drop runs the same teardown as `destroy()`.
    let client = PongClient { inner };
    let inner = &client.inner;

    *inner.socket_handlers.borrow_mut() = Some(SocketHandlers::attach(&ws, socket_callbacks(inner)));
    register_listeners(inner)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let weak = Rc::downgrade(inner);
    let frames = FrameLoop::start(&window, move || {
        if let Some(inner) = weak.upgrade() {
            inner.frame();
        }
    })?;
    inner.host.borrow_mut().set_frames(frames);

    flush(&inner.events, &inner.callbacks);
    Ok(client)
}

fn socket_callbacks(inner: &Rc<Inner>) -> SocketCallbacks {
    let on = |f: fn(&mut Session<WsTransport>)| {
        let weak: Weak<Inner> = Rc::downgrade(inner);
        move || {
            if let Some(inner) = weak.upgrade() {
                inner.with_session(f);
            }
        }
    };
    let weak_msg = Rc::downgrade(inner);
    let weak_close = Rc::downgrade(inner);

    SocketCallbacks {
        on_open: Box::new(on(|s| s.connection_mut().handle_open())),
        on_error: Box::new(on(|s| s.connection_mut().handle_error())),
        on_message: Box::new(move |bytes| {
            if let Some(inner) = weak_msg.upgrade() {
                inner.with_session(|s| {
                    // Malformed frames are logged and dropped inside
                    let _ = s.connection_mut().handle_message(&bytes);
                });
            }
        }),
        on_close: Box::new(move |code, reason| {
            if let Some(inner) = weak_close.upgrade() {
                inner.with_session(|s| s.connection_mut().handle_close(code, &reason));
            }
        }),
    }
}

/// Registered once per session, never from inside the frame loop
fn register_listeners(inner: &Rc<Inner>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut host = inner.host.borrow_mut();

    let weak = Rc::downgrade(inner);
    host.listen(&window, "keydown", move |e| {
        let (Some(inner), Some(key)) = (weak.upgrade(), e.dyn_ref::<KeyboardEvent>()) else {
            return;
        };
        inner.with_session(|s| {
            if s.key_down(&key.key()) {
                e.prevent_default();
            }
        });
    })?;

    let weak = Rc::downgrade(inner);
    host.listen(&window, "keyup", move |e| {
        let (Some(inner), Some(key)) = (weak.upgrade(), e.dyn_ref::<KeyboardEvent>()) else {
            return;
        };
        inner.with_session(|s| {
            s.key_up(&key.key());
        });
    })?;

    let weak = Rc::downgrade(inner);
    host.listen(&window, "blur", move |_e| {
        if let Some(inner) = weak.upgrade() {
            inner.with_session(|s| s.blur());
        }
    })?;

    let weak = Rc::downgrade(inner);
    host.listen(&inner.canvas, "pointerdown", move |e| {
        let (Some(inner), Some(m)) = (weak.upgrade(), e.dyn_ref::<MouseEvent>()) else {
            return;
        };
        let at = Vec2::new(m.offset_x() as f32, m.offset_y() as f32);
        inner.with_session(|s| s.pointer_down(at));
    })?;

    let weak = Rc::downgrade(inner);
    host.listen(&window, "resize", move |_e| {
        if let Some(inner) = weak.upgrade() {
            let size = inner.container_size();
            inner.with_session(|s| {
                s.resize(size);
            });
        }
    })?;

    let weak = Rc::downgrade(inner);
    host.observe_resize(&inner.container, move |_entries| {
        if let Some(inner) = weak.upgrade() {
            let size = inner.container_size();
            inner.with_session(|s| {
                s.resize(size);
            });
        }
    })?;

    Ok(())
}

/// Open games on `server`, as a JSON array
#[wasm_bindgen(js_name = fetchGames)]
pub async fn fetch_games(server: String) -> Result<JsValue, JsValue> {
    crate::logging::init(tracing::Level::INFO);
    // Listing needs no identity; any non-empty name passes validation
    let config = ClientConfig::new(&server, "lobby", None).map_err(to_js)?;
    let games = http::fetch_games(&config).await?;
    let json = serde_json::to_string(&games).map_err(to_js)?;
    js_sys::JSON::parse(&json)
}
