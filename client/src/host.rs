//! Glue to the chat platform's mini-app runtime (`window.Telegram.WebApp`).
//!
//! The runtime is plain JS, so everything here goes through `Reflect`.

use js_sys::{Array, Function, Object, Reflect};
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("host web app object is missing")]
    MissingHost,
    #[error("launch init data is missing")]
    MissingInitData,
    #[error("launch parameters carry no game id")]
    MissingGameId,
    #[error("launch parameters are malformed: {0}")]
    InvalidInitData(#[from] serde_json::Error),
}

#[derive(Deserialize, Default)]
struct InitDataUnsafe {
    start_param: Option<String>,
    user: Option<HostUser>,
}

#[derive(Deserialize)]
struct HostUser {
    language_code: Option<String>,
}

/// Identity the screen was launched with. Immutable for the screen's life.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchParams {
    /// Signed init data, passed back to the server as `_auth`.
    pub init_data: String,
    pub game_id: String,
    pub language_code: Option<String>,
}

impl LaunchParams {
    /// `unsafe_json` is the runtime's parsed view of the init data, as JSON.
    pub fn parse(init_data: Option<String>, unsafe_json: Option<&str>) -> Result<Self, StartupError> {
        let init_data = init_data
            .filter(|value| !value.is_empty())
            .ok_or(StartupError::MissingInitData)?;
        let unsafe_data: InitDataUnsafe = match unsafe_json {
            Some(json) => serde_json::from_str(json)?,
            None => InitDataUnsafe::default(),
        };
        let game_id = unsafe_data
            .start_param
            .filter(|value| !value.is_empty())
            .ok_or(StartupError::MissingGameId)?;
        Ok(Self {
            init_data,
            game_id,
            language_code: unsafe_data.user.and_then(|user| user.language_code),
        })
    }
}

pub struct HostApp {
    web_app: JsValue,
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn invoke(target: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let function = property(target, method)
        .ok_or_else(|| JsValue::from_str(&format!("Missing host method: {method}")))?
        .dyn_into::<Function>()?;
    function.apply(target, args)
}

impl HostApp {
    /// Wraps an already-located host web-app object.
    pub fn new(web_app: JsValue) -> Self {
        Self { web_app }
    }

    pub fn from_window(window: &Window) -> Result<Self, StartupError> {
        let telegram = property(window.as_ref(), "Telegram").ok_or(StartupError::MissingHost)?;
        let web_app = property(&telegram, "WebApp").ok_or(StartupError::MissingHost)?;
        Ok(Self::new(web_app))
    }

    /// Tells the runtime we're up, takes the full height, and asks before closing.
    pub fn prepare(&self) {
        for method in ["ready", "expand", "enableClosingConfirmation"] {
            if let Err(error) = invoke(&self.web_app, method, &Array::new()) {
                log::warn!("Host call {method} failed: {error:?}");
            }
        }
    }

    pub fn launch_params(&self) -> Result<LaunchParams, StartupError> {
        let init_data = property(&self.web_app, "initData").and_then(|value| value.as_string());
        let unsafe_json = property(&self.web_app, "initDataUnsafe")
            .and_then(|value| js_sys::JSON::stringify(&value).ok())
            .map(String::from);
        LaunchParams::parse(init_data, unsafe_json.as_deref())
    }

    /// Shows the runtime's main button labelled `label`; it closes the app.
    pub fn show_close_button(&self, label: &str) -> Result<(), JsValue> {
        let button = property(&self.web_app, "MainButton")
            .ok_or_else(|| JsValue::from_str("Missing host main button"))?;
        invoke(&button, "setText", &Array::of1(&JsValue::from_str(label)))?;
        invoke(&button, "show", &Array::new())?;

        let web_app = self.web_app.clone();
        let onclick = Closure::<dyn FnMut()>::new(move || {
            if let Err(error) = invoke(&web_app, "close", &Array::new()) {
                log::warn!("Host close failed: {error:?}");
            }
        });
        invoke(&button, "onClick", &Array::of1(onclick.as_ref()))?;
        onclick.forget();
        Ok(())
    }

    pub fn show_popup(&self, title: &str, message: &str) {
        let options = Object::new();
        let _ = Reflect::set(&options, &"title".into(), &JsValue::from_str(title));
        let _ = Reflect::set(&options, &"message".into(), &JsValue::from_str(message));
        if let Err(error) = invoke(&self.web_app, "showPopup", &Array::of1(&options)) {
            log::warn!("Host popup failed: {error:?}");
        }
    }
}
