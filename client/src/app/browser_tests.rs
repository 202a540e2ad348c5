use std::cell::Cell;

use wasm_bindgen_test::*;
use web_sys::HtmlElement;

use super::*;
use crate::geometry::Point;
use crate::state::Tool;

// https://rustwasm.github.io/wasm-bindgen/wasm-bindgen-test/browsers.html
wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|window| window.document())
        .unwrap()
}

fn create<T: JsCast>(document: &Document, tag: &str) -> T {
    document
        .create_element(tag)
        .unwrap()
        .dyn_into::<T>()
        .unwrap()
}

fn test_screen() -> SharedScreen {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let config = Config::default();
    let params = LaunchParams {
        init_data: "auth".to_string(),
        game_id: "game-1".to_string(),
        language_code: None,
    };
    let layers = Layers::new(&document, create(&document, "canvas")).unwrap();
    let controls = Controls {
        brushes: [
            create(&document, "button"),
            create(&document, "button"),
            create(&document, "button"),
        ],
        eraser: create(&document, "button"),
        clear: create(&document, "button"),
        word: create(&document, "button"),
        color: create(&document, "input"),
    };
    let board = Board::new(&config, 400.0, 300.0);
    let reconnect = ReconnectPolicy::new(config.reconnect);
    Rc::new(RefCell::new(Screen {
        config,
        locale: Locale::En,
        params,
        host: HostApp::new(js_sys::Object::new().into()),
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
    }))
}

#[wasm_bindgen_test]
fn detached_listener_is_not_called() {
    let document = document();
    let button: HtmlButtonElement = create(&document, "button");
    let clicks = Rc::new(Cell::new(0));
    let mut listeners = Listeners::default();
    {
        let clicks = clicks.clone();
        listeners
            .listen(button.as_ref(), "click", move |_: Event| {
                clicks.set(clicks.get() + 1);
            })
            .unwrap();
    }

    button.click();
    assert_eq!(clicks.get(), 1);

    listeners.detach_all();
    assert!(listeners.is_empty());
    button.click();
    assert_eq!(clicks.get(), 1);
}

#[wasm_bindgen_test]
fn terminate_stops_input_publishing_and_push() {
    let document = document();
    let message: HtmlElement = create(&document, "div");
    message.set_id("fullscreen-message");
    document.body().unwrap().append_child(&message).unwrap();

    let screen = test_screen();
    attach_listeners(&screen).unwrap();
    start_publisher(&screen).unwrap();
    let channel = connect_events("/web/app/events", |_| {}).unwrap();
    assert!(!channel.is_closed());
    screen.borrow_mut().channel = Some(channel);

    handle_input(&screen, PointerInput::Down(Point { x: 100.0, y: 100.0 }));
    handle_input(&screen, PointerInput::Up);
    assert!(screen.borrow().board.dirty);

    terminate(&screen, &ErrorReason::Ended);

    let eraser = screen.borrow().controls.eraser.clone();
    eraser.click();
    publish_tick(&screen);
    on_channel_event(&screen, ChannelEvent::Dropped);

    {
        let screen = screen.borrow();
        assert!(screen.board.halted);
        assert_eq!(screen.board.tool(), Tool::Painter);
        assert!(screen.listeners.is_empty());
        assert_eq!(screen.scroll_guard.len(), 1);
        assert!(screen.publish_timer.is_none());
        assert_eq!(screen.board.uploads_in_flight, 0);
        assert!(screen.channel.as_ref().is_some_and(EventChannel::is_closed));
        assert_eq!(screen.reconnect.attempts(), 0);
    }
    assert_eq!(message.text_content().as_deref(), Some("Game ended"));

    message.remove();
}

#[wasm_bindgen_test]
fn second_terminate_keeps_the_first_reason() {
    let document = document();
    let message: HtmlElement = create(&document, "div");
    message.set_id("fullscreen-message");
    document.body().unwrap().append_child(&message).unwrap();

    let screen = test_screen();
    terminate(&screen, &ErrorReason::NotHost);
    terminate(&screen, &ErrorReason::Ended);

    assert_eq!(message.text_content().as_deref(), Some("You`re not the host"));

    message.remove();
}
