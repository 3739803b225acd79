//! Browser platform glue
//!
//! Time, storage access and scoped event subscriptions. Listeners are owned
//! values here: registering one returns an [`EventSubscription`] that
//! removes the listener again when dropped, so the whole teardown path is
//! dropping a Vec.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use web_sys::EventTarget;

/// Milliseconds since the epoch, per the host clock
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Session storage handle, if the platform grants one
pub fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.session_storage().ok())
        .flatten()
}

/// A DOM event listener that stays installed for exactly as long as this
/// value lives
pub struct EventSubscription {
    target: EventTarget,
    event: &'static str,
    callback: js_sys::Function,
    _closure: Box<dyn std::any::Any>,
}

impl EventSubscription {
    /// Register `handler` for `event` on `target`.
    ///
    /// The event type is whatever concrete `web_sys` event the handler
    /// expects; the browser hands the same object over either way.
    pub fn listen<E, F>(target: &EventTarget, event: &'static str, handler: F) -> Self
    where
        E: FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let callback = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        if target
            .add_event_listener_with_callback(event, &callback)
            .is_err()
        {
            log::warn!("Failed to attach {event} listener");
        }
        Self {
            target: target.clone(),
            event,
            callback,
            _closure: Box::new(closure),
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, &self.callback);
    }
}
