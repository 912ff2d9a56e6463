//! Frame scheduling and DOM listener registrations

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, ResizeObserver, Window};

use crate::session::FrameHost;

/// `requestAnimationFrame` loop. The callback re-registers itself after each
/// frame until cancelled.
pub struct FrameLoop {
    window: Window,
    _callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    handle: Rc<Cell<Option<i32>>>,
    cancelled: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn start(window: &Window, mut on_frame: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let cancelled = Rc::new(Cell::new(false));

        let weak = Rc::downgrade(&callback);
        let window_loop = window.clone();
        let handle_loop = handle.clone();
        let cancelled_loop = cancelled.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            handle_loop.set(None);
            if cancelled_loop.get() {
                return;
            }
            on_frame();
            // The frame may have torn the session down
            if cancelled_loop.get() {
                return;
            }
            let Some(cell) = weak.upgrade() else {
                return;
            };
            let cell = cell.borrow();
            if let Some(cb) = cell.as_ref() {
                match window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => handle_loop.set(Some(id)),
                    Err(e) => tracing::error!(error = ?e, "requestAnimationFrame failed"),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        {
            let cell = callback.borrow();
            if let Some(cb) = cell.as_ref() {
                handle.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
            }
        }

        Ok(Self {
            window: window.clone(),
            _callback: callback,
            handle,
            cancelled,
        })
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

/// One `addEventListener` registration
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Everything the browser holds on the session's behalf. Closures are only
/// dropped with the host, never while they might be running.
#[derive(Default)]
pub struct BrowserHost {
    frames: Option<FrameLoop>,
    listeners: Vec<Listener>,
    observer: Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>,
    released: bool,
}

impl BrowserHost {
    pub fn set_frames(&mut self, frames: FrameLoop) {
        self.frames = Some(frames);
    }

    pub fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    pub fn observe_resize(
        &mut self,
        element: &Element,
        handler: impl FnMut(js_sys::Array) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())?;
        observer.observe(element);
        self.observer = Some((observer, closure));
        Ok(())
    }
}

impl Drop for BrowserHost {
    // Nothing registered may outlive the closures freed with the host
    fn drop(&mut self) {
        self.cancel_frames();
        self.release_listeners();
    }
}

impl FrameHost for BrowserHost {
    fn cancel_frames(&mut self) {
        if let Some(frames) = &self.frames {
            frames.cancel();
        }
    }

    fn release_listeners(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for l in &self.listeners {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref());
        }
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
        tracing::debug!(count = self.listeners.len(), "listeners released");
    }
}
