use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement,
    HtmlInputElement, MouseEvent, TouchEvent, Window,
};

use guessdraw_shared::i18n::Locale;
use guessdraw_shared::{ErrorReason, PushEvent, EVENTS_PATH};

use crate::actions::{apply_input, clear_board, resize_board};
use crate::config::Config;
use crate::dom::{get_element, set_selected, show_blocking_message, Listeners};
use crate::events::{connect_events, ChannelEvent, EventChannel, ReconnectPolicy};
use crate::host::{HostApp, LaunchParams};
use crate::input::{PointerInput, PointerPhase};
use crate::net::{endpoint_url, fetch_word, js_error, upload_snapshot, NetError, WordResponse};
use crate::publish::{take_snapshot, upload_finished, upload_started};
use crate::render::{encode_canvas, Layers};
use crate::state::Board;

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests;

#[derive(Clone, Copy)]
enum ToolChoice {
    Brush(usize),
    Eraser,
}

struct Controls {
    brushes: [HtmlButtonElement; 3],
    eraser: HtmlButtonElement,
    clear: HtmlButtonElement,
    word: HtmlButtonElement,
    color: HtmlInputElement,
}

/// Everything the drawing screen owns. Handlers reach it through
/// `SharedScreen`; there is no other mutable state.
struct Screen {
    config: Config,
    locale: Locale,
    params: LaunchParams,
    host: HostApp,
    window: Window,
    document: Document,
    board: Board,
    layers: Layers,
    controls: Controls,
    selected: Option<Element>,
    listeners: Listeners,
    /// Document-wide scroll suppression. Stays attached after teardown so the
    /// blocking message cannot be swiped away.
    scroll_guard: Listeners,
    publish_timer: Option<i32>,
    publish_tick: Option<Closure<dyn FnMut()>>,
    channel: Option<EventChannel>,
    reconnect: ReconnectPolicy,
}

type SharedScreen = Rc<RefCell<Screen>>;

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let search = window.location().search().unwrap_or_default();
    let config = Config::from_query(&search);
    let _ = console_log::init_with_level(config.log_level());

    if document.ready_state() != "loading" {
        return start_app(config);
    }

    let mut pending = Some(config);
    let onready = Closure::<dyn FnMut(Event)>::new(move |_| {
        let Some(config) = pending.take() else {
            return;
        };
        if let Err(err) = start_app(config) {
            log::error!("Drawing screen failed to start: {err:?}");
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", onready.as_ref().unchecked_ref())?;
    onready.forget();

    Ok(())
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    (width, height)
}

fn start_app(config: Config) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let platform_language = window.navigator().language();
    let fallback_locale = Locale::resolve(None, platform_language.as_deref());

    let host = match HostApp::from_window(&window) {
        Ok(host) => host,
        Err(error) => {
            log::error!("No launch identity: {error}");
            show_blocking_message(&document, fallback_locale.tr(ErrorReason::NotAuth.key()));
            return Ok(());
        }
    };
    host.prepare();
    let params = match host.launch_params() {
        Ok(params) => params,
        Err(error) => {
            log::error!("No launch identity: {error}");
            show_blocking_message(&document, fallback_locale.tr(ErrorReason::NotAuth.key()));
            return Ok(());
        }
    };
    let locale = Locale::resolve(params.language_code.as_deref(), platform_language.as_deref());
    if let Err(error) = host.show_close_button(locale.tr("close")) {
        log::warn!("Close button unavailable: {error:?}");
    }

    let canvas: HtmlCanvasElement = get_element(&document, "paintarea")?;
    let layers = Layers::new(&document, canvas)?;
    let controls = Controls {
        brushes: [
            get_element(&document, "small-dot")?,
            get_element(&document, "medium-dot")?,
            get_element(&document, "large-dot")?,
        ],
        eraser: get_element(&document, "eraser")?,
        clear: get_element(&document, "clear")?,
        word: get_element(&document, "word")?,
        color: get_element(&document, "color")?,
    };

    let (width, height) = viewport_size(&window);
    let mut board = Board::new(&config, width, height);
    let initial_color = controls.color.value();
    if !initial_color.is_empty() {
        board.tools.set_color(initial_color);
    }
    layers.apply(&resize_board(&mut board, width, height));

    let reveal_word = config.reveal_word_on_start;
    let reconnect = ReconnectPolicy::new(config.reconnect);
    let game_id = params.game_id.clone();
    let screen = Rc::new(RefCell::new(Screen {
        config,
        locale,
        params,
        host,
        window,
        document,
        board,
        layers,
        controls,
        selected: None,
        listeners: Listeners::default(),
        scroll_guard: Listeners::default(),
        publish_timer: None,
        publish_tick: None,
        channel: None,
        reconnect,
    }));

    select_tool(&mut screen.borrow_mut(), ToolChoice::Brush(0));
    attach_listeners(&screen)?;
    start_publisher(&screen)?;
    open_channel(&screen);
    if reveal_word {
        show_word(&screen);
    }
    log::info!("Drawing screen ready for game {game_id}");

    Ok(())
}

fn select_tool(screen: &mut Screen, choice: ToolChoice) {
    let button: Element = match choice {
        ToolChoice::Brush(index) => {
            screen
                .board
                .tools
                .select_brush(screen.config.brush_sizes[index]);
            screen.controls.brushes[index].clone().into()
        }
        ToolChoice::Eraser => {
            screen
                .board
                .tools
                .select_eraser(screen.config.eraser_size, screen.config.eraser_color);
            screen.controls.eraser.clone().into()
        }
    };
    set_selected(screen.selected.as_ref(), &button);
    screen.selected = Some(button);
}

fn handle_input(screen: &SharedScreen, input: PointerInput) {
    let mut guard = screen.borrow_mut();
    let screen = &mut *guard;
    let ops = apply_input(&mut screen.board, input);
    screen.layers.apply(&ops);
}

fn attach_listeners(screen: &SharedScreen) -> Result<(), JsValue> {
    let (window, document, canvas, brushes, eraser, clear, word, color) = {
        let screen = screen.borrow();
        (
            screen.window.clone(),
            screen.document.clone(),
            screen.layers.canvas.clone(),
            screen.controls.brushes.clone(),
            screen.controls.eraser.clone(),
            screen.controls.clear.clone(),
            screen.controls.word.clone(),
            screen.controls.color.clone(),
        )
    };
    let mut listeners = Listeners::default();

    // Keeps the host from collapsing the app on vertical swipes.
    let mut scroll_guard = Listeners::default();
    scroll_guard.listen_active(document.as_ref(), "touchmove", |event: TouchEvent| {
        event.prevent_default();
    })?;

    for (index, button) in brushes.iter().enumerate() {
        let screen = screen.clone();
        listeners.listen(button.as_ref(), "click", move |_: Event| {
            select_tool(&mut screen.borrow_mut(), ToolChoice::Brush(index));
        })?;
    }

    {
        let screen = screen.clone();
        listeners.listen(eraser.as_ref(), "click", move |_: Event| {
            select_tool(&mut screen.borrow_mut(), ToolChoice::Eraser);
        })?;
    }

    {
        let screen = screen.clone();
        listeners.listen(clear.as_ref(), "click", move |_: Event| {
            let mut guard = screen.borrow_mut();
            let screen = &mut *guard;
            let ops = clear_board(&mut screen.board);
            screen.layers.apply(&ops);
        })?;
    }

    {
        let screen = screen.clone();
        listeners.listen(word.as_ref(), "click", move |_: Event| {
            show_word(&screen);
        })?;
    }

    {
        let screen = screen.clone();
        let input = color.clone();
        listeners.listen(color.as_ref(), "change", move |_: Event| {
            screen.borrow_mut().board.tools.set_color(input.value());
        })?;
    }

    for (name, phase) in [
        ("mousedown", PointerPhase::Down),
        ("mousemove", PointerPhase::Move),
        ("mouseup", PointerPhase::Up),
    ] {
        let screen = screen.clone();
        listeners.listen(canvas.as_ref(), name, move |event: MouseEvent| {
            if let Some(input) = PointerInput::from_mouse(phase, &event) {
                handle_input(&screen, input);
            }
        })?;
    }

    let canvas_target: EventTarget = canvas.clone().into();
    for (name, phase) in [
        ("touchstart", PointerPhase::Down),
        ("touchmove", PointerPhase::Move),
        ("touchend", PointerPhase::Up),
        ("touchcancel", PointerPhase::Up),
    ] {
        let screen = screen.clone();
        let canvas_target = canvas_target.clone();
        listeners.listen(canvas.as_ref(), name, move |event: TouchEvent| {
            if event.target().as_ref() == Some(&canvas_target) {
                event.prevent_default();
            }
            if let Some(input) = PointerInput::from_touch(phase, &event) {
                handle_input(&screen, input);
            }
        })?;
    }

    {
        let screen = screen.clone();
        listeners.listen(window.as_ref(), "resize", move |_: Event| {
            let mut guard = screen.borrow_mut();
            let screen = &mut *guard;
            let (width, height) = viewport_size(&screen.window);
            let ops = resize_board(&mut screen.board, width, height);
            screen.layers.apply(&ops);
        })?;
    }

    log::debug!("Attached {} listeners", listeners.len());
    let mut screen = screen.borrow_mut();
    screen.listeners = listeners;
    screen.scroll_guard = scroll_guard;
    Ok(())
}

fn start_publisher(screen: &SharedScreen) -> Result<(), JsValue> {
    let tick_screen = screen.clone();
    let mut guard = screen.borrow_mut();
    let screen = &mut *guard;
    let tick = screen
        .publish_tick
        .insert(Closure::<dyn FnMut()>::new(move || publish_tick(&tick_screen)));
    let handle = screen
        .window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            screen.config.publish_interval_ms,
        )?;
    screen.publish_timer = Some(handle);
    Ok(())
}

fn publish_tick(screen: &SharedScreen) {
    let (snapshot, params, config) = {
        let mut guard = screen.borrow_mut();
        let screen = &mut *guard;
        let Some(crop) = take_snapshot(&mut screen.board, screen.config.publish_padding) else {
            return;
        };
        let snapshot = match screen.layers.crop_backing(&screen.document, &crop) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                log::warn!("Snapshot crop failed: {error:?}");
                return;
            }
        };
        let pending = upload_started(&mut screen.board);
        if pending > 0 {
            log::debug!("Publishing while {pending} upload(s) are still pending");
        }
        log::debug!(
            "Publishing snapshot x={} y={} size={}x{}",
            crop.x,
            crop.y,
            crop.width,
            crop.height
        );
        (snapshot, screen.params.clone(), screen.config.clone())
    };

    let screen = screen.clone();
    spawn_local(async move {
        match publish_snapshot(&snapshot, &params, &config).await {
            Ok(status) => log::debug!("Snapshot upload status={status}"),
            Err(error) => log::warn!("Snapshot upload failed: {error}"),
        }
        upload_finished(&mut screen.borrow_mut().board);
    });
}

async fn publish_snapshot(
    snapshot: &HtmlCanvasElement,
    params: &LaunchParams,
    config: &Config,
) -> Result<u16, NetError> {
    let image = encode_canvas(snapshot, config.image_mime, config.image_quality)
        .await
        .map_err(|error| NetError::Encode(js_error(error)))?;
    log::debug!("Snapshot encoded bytes={}", image.size());
    upload_snapshot(params, &image, config.image_filename).await
}

fn show_word(screen: &SharedScreen) {
    let (window, params) = {
        let screen = screen.borrow();
        if let Some(word) = screen.board.cached_word() {
            screen.host.show_popup(screen.locale.tr("word"), word);
            return;
        }
        (screen.window.clone(), screen.params.clone())
    };

    let screen = screen.clone();
    spawn_local(async move {
        match fetch_word(&window, &params).await {
            Ok(WordResponse::Word(word)) => {
                let mut guard = screen.borrow_mut();
                let screen = &mut *guard;
                if screen.board.halted {
                    return;
                }
                screen.host.show_popup(screen.locale.tr("word"), &word);
                screen.board.remember_word(word);
            }
            Ok(WordResponse::Rejected(reason)) => terminate(&screen, &reason),
            Err(error) => log::warn!("Word fetch failed: {error}"),
        }
    });
}

fn open_channel(screen: &SharedScreen) {
    let url = {
        let screen = screen.borrow();
        endpoint_url(&screen.window, EVENTS_PATH, &screen.params)
    };
    let url = match url {
        Ok(url) => url,
        Err(error) => {
            log::error!("Push channel unavailable: {error}");
            return;
        }
    };
    let channel_screen = screen.clone();
    match connect_events(&url, move |event| on_channel_event(&channel_screen, event)) {
        Ok(channel) => screen.borrow_mut().channel = Some(channel),
        Err(error) => {
            log::warn!("Push channel failed to open: {error:?}");
            schedule_reconnect(screen);
        }
    }
}

fn on_channel_event(screen: &SharedScreen, event: ChannelEvent) {
    match event {
        ChannelEvent::Open => {
            log::info!("Push channel open");
            screen.borrow_mut().reconnect.reset();
        }
        ChannelEvent::Push(PushEvent::Word(word)) => {
            let mut guard = screen.borrow_mut();
            let screen = &mut *guard;
            screen.host.show_popup(screen.locale.tr("word"), &word);
            screen.board.remember_word(word);
        }
        ChannelEvent::Push(PushEvent::Terminated(reason)) => terminate(screen, &reason),
        ChannelEvent::Dropped => {
            {
                let screen = screen.borrow();
                if screen.board.halted {
                    return;
                }
                // The browser would retry on its own; we pace retries instead.
                if let Some(channel) = &screen.channel {
                    if channel.is_closed() {
                        log::debug!("Push channel was closed by the browser");
                    }
                    channel.close();
                }
            }
            log::warn!("Push channel dropped");
            schedule_reconnect(screen);
        }
    }
}

fn schedule_reconnect(screen: &SharedScreen) {
    let (window, delay, attempts) = {
        let mut screen = screen.borrow_mut();
        let delay = screen.reconnect.next_delay();
        (screen.window.clone(), delay, screen.reconnect.attempts())
    };
    let Some(delay) = delay else {
        log::warn!("Push channel gave up after {attempts} attempts");
        terminate(screen, &ErrorReason::Error);
        return;
    };
    log::info!("Reconnecting push channel in {delay} ms (attempt {attempts})");
    let screen = screen.clone();
    let onretry = Closure::once_into_js(move || {
        if screen.borrow().board.halted {
            return;
        }
        open_channel(&screen);
    });
    if let Err(error) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        onretry.unchecked_ref(),
        delay as i32,
    ) {
        log::error!("Cannot schedule push reconnect: {error:?}");
    }
}

/// Terminal state: show why, then stop input, publishing and the push channel.
/// In-flight requests are left to finish; their completions check `halted`.
fn terminate(screen: &SharedScreen, reason: &ErrorReason) {
    let mut guard = screen.borrow_mut();
    let screen = &mut *guard;
    if screen.board.halted {
        return;
    }
    log::warn!("Game screen stopped: {}", reason.key());
    show_blocking_message(&screen.document, screen.locale.tr(reason.key()));
    screen.board.halt();
    if !screen.listeners.is_empty() {
        log::debug!(
            "Detaching {} listeners, keeping {} scroll guard(s)",
            screen.listeners.len(),
            screen.scroll_guard.len()
        );
        screen.listeners.detach_all();
    }
    // The tick closure itself is kept; teardown may run inside a callback.
    if let Some(handle) = screen.publish_timer.take() {
        screen.window.clear_interval_with_handle(handle);
    }
    if let Some(channel) = &screen.channel {
        channel.close();
    }
}
