use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement};

pub const SELECTED_CLASS: &str = "selected";
const MESSAGE_ID: &str = "fullscreen-message";

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Moves the `selected` highlight from `previous` (if any) to `next`.
pub fn set_selected(previous: Option<&Element>, next: &Element) {
    if let Some(previous) = previous {
        let _ = previous.class_list().remove_1(SELECTED_CLASS);
    }
    let _ = next.class_list().add_1(SELECTED_CLASS);
}

/// Covers the screen with `message`. Used for terminal states only.
pub fn show_blocking_message(document: &Document, message: &str) {
    let Ok(element) = get_element::<HtmlElement>(document, MESSAGE_ID) else {
        log::error!("Cannot show blocking message {message:?}: no #{MESSAGE_ID}");
        return;
    };
    element.set_inner_text(message);
    let _ = element.style().set_property("visibility", "visible");
}

struct Registration {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Event listeners that can all be removed again.
///
/// Detached callbacks are kept alive: a detach may run from inside one of them.
#[derive(Default)]
pub struct Listeners {
    active: Vec<Registration>,
    retired: Vec<Registration>,
}

impl Listeners {
    pub fn listen<E: JsCast + 'static>(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        mut handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(event);
            }
        });
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.active.push(Registration {
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }

    /// Like `listen`, but allowed to call `prevent_default` on scroll-type events.
    pub fn listen_active<E: JsCast + 'static>(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        mut handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(event);
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        self.active.push(Registration {
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn detach_all(&mut self) {
        for registration in self.active.drain(..) {
            let _ = registration.target.remove_event_listener_with_callback(
                registration.event,
                registration.callback.as_ref().unchecked_ref(),
            );
            self.retired.push(registration);
        }
    }
}
