//! Event sink that queues for JavaScript
//!
//! Events are raised while the session is borrowed; JS handlers may call back
//! into the client (e.g. `destroy()`), so they run only after the borrow ends.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use proto::{GameState, Winner};
use wasm_bindgen::{JsCast, JsValue};

use crate::fsm::ConnectError;
use crate::network::EventSink;
use crate::status::DisplayIntent;

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Connect,
    ConnectError(ConnectError),
    Disconnect,
    State(GameState),
    Status(DisplayIntent),
    GameId(String),
}

pub type EventQueue = Rc<RefCell<VecDeque<ClientEvent>>>;

pub struct QueueSink {
    queue: EventQueue,
}

impl QueueSink {
    pub fn new(queue: EventQueue) -> Self {
        Self { queue }
    }

    fn push(&self, event: ClientEvent) {
        self.queue.borrow_mut().push_back(event);
    }
}

impl EventSink for QueueSink {
    fn on_connect(&mut self) {
        self.push(ClientEvent::Connect);
        self.push(ClientEvent::Status(DisplayIntent::connected()));
    }

    fn on_connect_error(&mut self, error: &ConnectError) {
        self.push(ClientEvent::ConnectError(error.clone()));
    }

    fn on_disconnect(&mut self) {
        self.push(ClientEvent::Disconnect);
        self.push(ClientEvent::Status(DisplayIntent::disconnected()));
    }

    fn on_state(&mut self, state: &GameState) {
        self.push(ClientEvent::State(*state));
    }

    fn on_status(&mut self, intent: &DisplayIntent) {
        self.push(ClientEvent::Status(intent.clone()));
    }

    fn on_game_id(&mut self, id: &str) {
        self.push(ClientEvent::GameId(id.to_string()));
    }
}

/// Handler functions read from the callbacks object passed by the page:
/// `{ onConnect, onConnectError, onDisconnect, onState, onStatus, onGameId }`.
/// Missing handlers are skipped.
#[derive(Default)]
pub struct JsCallbacks {
    on_connect: Option<Function>,
    on_connect_error: Option<Function>,
    on_disconnect: Option<Function>,
    on_state: Option<Function>,
    on_status: Option<Function>,
    on_game_id: Option<Function>,
}

impl JsCallbacks {
    pub fn from_object(obj: &JsValue) -> Self {
        let get = |name: &str| -> Option<Function> {
            if obj.is_undefined() || obj.is_null() {
                return None;
            }
            Reflect::get(obj, &JsValue::from_str(name))
                .ok()
                .and_then(|v| v.dyn_into::<Function>().ok())
        };
        Self {
            on_connect: get("onConnect"),
            on_connect_error: get("onConnectError"),
            on_disconnect: get("onDisconnect"),
            on_state: get("onState"),
            on_status: get("onStatus"),
            on_game_id: get("onGameId"),
        }
    }

    pub fn dispatch(&self, event: &ClientEvent) {
        let result = match event {
            ClientEvent::Connect => call0(&self.on_connect),
            ClientEvent::ConnectError(e) => {
                call1(&self.on_connect_error, &JsValue::from_str(&e.to_string()))
            }
            ClientEvent::Disconnect => call0(&self.on_disconnect),
            ClientEvent::State(state) => call1(&self.on_state, &state_object(state)),
            ClientEvent::Status(intent) => call1(&self.on_status, &intent_object(intent)),
            ClientEvent::GameId(id) => call1(&self.on_game_id, &JsValue::from_str(id)),
        };
        if let Err(e) = result {
            tracing::error!(error = ?e, "event handler threw");
        }
    }
}

/// Drain the queue. Borrows are held only long enough to pop one event.
pub fn flush(queue: &EventQueue, callbacks: &JsCallbacks) {
    loop {
        let next = queue.borrow_mut().pop_front();
        match next {
            Some(event) => callbacks.dispatch(&event),
            None => break,
        }
    }
}

fn call0(f: &Option<Function>) -> Result<(), JsValue> {
    if let Some(f) = f {
        f.call0(&JsValue::NULL)?;
    }
    Ok(())
}

fn call1(f: &Option<Function>, arg: &JsValue) -> Result<(), JsValue> {
    if let Some(f) = f {
        f.call1(&JsValue::NULL, arg)?;
    }
    Ok(())
}

fn set(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn winner_value(winner: Winner) -> JsValue {
    match winner {
        Winner::None => JsValue::NULL,
        Winner::Left => JsValue::from_str("left"),
        Winner::Right => JsValue::from_str("right"),
    }
}

fn state_object(state: &GameState) -> JsValue {
    let obj = Object::new();
    set(&obj, "ballX", state.ball.x.into());
    set(&obj, "ballY", state.ball.y.into());
    set(&obj, "leftPaddleY", state.paddles.left.into());
    set(&obj, "rightPaddleY", state.paddles.right.into());
    set(&obj, "leftScore", state.score.left.into());
    set(&obj, "rightScore", state.score.right.into());
    set(&obj, "winner", winner_value(state.winner));
    obj.into()
}

fn intent_object(intent: &DisplayIntent) -> JsValue {
    let obj = Object::new();
    let code = match &intent.code {
        Some(code) => JsValue::from_str(code.as_str()),
        None => JsValue::NULL,
    };
    set(&obj, "code", code);
    set(&obj, "text", JsValue::from_str(&intent.text));
    set(&obj, "gameOver", intent.game_over.into());
    set(&obj, "winner", winner_value(intent.winner));
    obj.into()
}
