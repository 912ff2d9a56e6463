//! Browser WebSocket transport

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{BinaryType, CloseEvent, Event, MessageEvent, WebSocket};

use crate::network::{Transport, TransportError};

pub struct WsTransport {
    ws: WebSocket,
}

impl WsTransport {
    pub fn open(url: &str) -> Result<Self, JsValue> {
        let ws = WebSocket::new(url)?;
        ws.set_binary_type(BinaryType::Arraybuffer);
        Ok(Self { ws })
    }

    pub fn socket(&self) -> &WebSocket {
        &self.ws
    }

    /// Unhook all handlers. The closures stay owned by [`SocketHandlers`].
    fn detach(&self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
    }
}

impl Transport for WsTransport {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), TransportError> {
        self.ws
            .send_with_u8_array(bytes)
            .map_err(|e| TransportError::Send(format!("{:?}", e)))
    }

    fn close(&self) {
        self.detach();
        if let Err(e) = self.ws.close() {
            tracing::warn!(error = ?e, "socket close failed");
        }
    }
}

/// Socket callbacks, as plain Rust closures
pub struct SocketCallbacks {
    pub on_open: Box<dyn FnMut()>,
    pub on_message: Box<dyn FnMut(Vec<u8>)>,
    pub on_error: Box<dyn FnMut()>,
    pub on_close: Box<dyn FnMut(u16, String)>,
}

/// Keeps the JS closures alive for as long as the client exists
pub struct SocketHandlers {
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _error: Closure<dyn FnMut(Event)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
}

impl SocketHandlers {
    pub fn attach(ws: &WebSocket, callbacks: SocketCallbacks) -> Self {
        let SocketCallbacks {
            mut on_open,
            mut on_message,
            mut on_error,
            mut on_close,
        } = callbacks;

        let open = Closure::wrap(Box::new(move |_e: Event| on_open()) as Box<dyn FnMut(Event)>);
        let message = Closure::wrap(Box::new(move |e: MessageEvent| {
            match e.data().dyn_into::<js_sys::ArrayBuffer>() {
                Ok(buf) => on_message(js_sys::Uint8Array::new(&buf).to_vec()),
                Err(_) => tracing::debug!("ignoring non-binary message"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        let error = Closure::wrap(Box::new(move |_e: Event| on_error()) as Box<dyn FnMut(Event)>);
        let close = Closure::wrap(Box::new(move |e: CloseEvent| {
            on_close(e.code(), e.reason())
        }) as Box<dyn FnMut(CloseEvent)>);

        ws.set_onopen(Some(open.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(message.as_ref().unchecked_ref()));
        ws.set_onerror(Some(error.as_ref().unchecked_ref()));
        ws.set_onclose(Some(close.as_ref().unchecked_ref()));

        Self {
            _open: open,
            _message: message,
            _error: error,
            _close: close,
        }
    }
}
