use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventSource, MessageEvent};

use guessdraw_shared::{PushEvent, ERROR_EVENT, WORD_EVENT};

use crate::config::ReconnectConfig;

#[derive(Debug)]
pub enum ChannelEvent {
    Open,
    /// The transport failed; no server reason attached.
    Dropped,
    Push(PushEvent),
}

/// Server-push subscription for one game screen.
pub struct EventChannel {
    source: EventSource,
    callbacks: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl EventChannel {
    /// Stops delivery. Callbacks stay owned by the channel, so this is safe to
    /// call from inside one of them.
    pub fn close(&self) {
        for (event, callback) in &self.callbacks {
            let _ = self
                .source
                .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        }
        self.source.close();
    }

    pub fn is_closed(&self) -> bool {
        self.source.ready_state() == EventSource::CLOSED
    }
}

fn message_text(event: &Event) -> Option<String> {
    event
        .dyn_ref::<MessageEvent>()
        .and_then(|message| message.data().as_string())
}

/// `error` fires both for server-sent error events, which carry a reason,
/// and for transport failures, which carry no data at all. An empty reason
/// is still the server's and maps to the generic error.
pub fn classify_error(data: Option<String>) -> Option<ChannelEvent> {
    match data {
        Some(reason) => PushEvent::parse(ERROR_EVENT, &reason).map(ChannelEvent::Push),
        None => Some(ChannelEvent::Dropped),
    }
}

pub fn connect_events(
    url: &str,
    on_event: impl 'static + FnMut(ChannelEvent),
) -> Result<EventChannel, JsValue> {
    let source = EventSource::new(url)?;
    let on_event = Rc::new(RefCell::new(on_event));
    let mut callbacks = Vec::with_capacity(4);

    {
        let on_event = on_event.clone();
        let onopen = Closure::<dyn FnMut(Event)>::new(move |_| {
            on_event.borrow_mut()(ChannelEvent::Open);
        });
        callbacks.push(("open", onopen));
    }

    {
        let on_event = on_event.clone();
        let onword = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(word) = message_text(&event) else {
                log::error!("Push word event without text data");
                return;
            };
            if let Some(push) = PushEvent::parse(WORD_EVENT, &word) {
                on_event.borrow_mut()(ChannelEvent::Push(push));
            }
        });
        callbacks.push((WORD_EVENT, onword));
    }

    {
        let on_event = on_event.clone();
        let onerror = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(channel_event) = classify_error(message_text(&event)) {
                on_event.borrow_mut()(channel_event);
            }
        });
        callbacks.push((ERROR_EVENT, onerror));
    }

    {
        let on_event = on_event.clone();
        let onmessage = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(data) = message_text(&event) else {
                log::error!("Push message without text data");
                return;
            };
            if let Some(push) = PushEvent::parse("message", &data) {
                on_event.borrow_mut()(ChannelEvent::Push(push));
            }
        });
        callbacks.push(("message", onmessage));
    }

    for (event, callback) in &callbacks {
        source.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    }

    Ok(EventChannel { source, callbacks })
}

/// Linear backoff over a bounded number of consecutive reconnects.
#[derive(Debug)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    attempts: u32,
}

impl ReconnectPolicy {
    pub fn new(config: ReconnectConfig) -> Self {
        Self {
            config,
            attempts: 0,
        }
    }

    /// A successful open starts the count over.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay before the next attempt, or `None` once attempts are used up.
    pub fn next_delay(&mut self) -> Option<u32> {
        if self.attempts >= self.config.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(
            self.config
                .base_delay_ms
                .saturating_mul(self.attempts)
                .min(self.config.max_delay_ms),
        )
    }
}
