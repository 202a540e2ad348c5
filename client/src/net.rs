use gloo_net::http::Request;
use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData, Url, Window};

use guessdraw_shared::{ErrorReason, AUTH_FIELD, GAME_ID_FIELD, IMAGE_FIELD, UPDATE_PATH, WORD_PATH};

use crate::host::LaunchParams;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("request failed: {0}")]
    Http(#[from] gloo_net::Error),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("could not build form: {0}")]
    Form(String),
    #[error("could not encode image: {0}")]
    Encode(String),
}

pub(crate) fn js_error(error: JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WordResponse {
    Word(String),
    Rejected(ErrorReason),
}

impl WordResponse {
    /// The body is the word on success, otherwise a reason key.
    pub fn from_status(status: u16, body: String) -> Self {
        if status < 400 {
            WordResponse::Word(body)
        } else {
            WordResponse::Rejected(ErrorReason::from_key(&body))
        }
    }
}

/// Resolves `path` against the page and attaches the session identity.
pub fn endpoint_url(window: &Window, path: &str, params: &LaunchParams) -> Result<String, NetError> {
    let base = window.location().href().map_err(|e| NetError::Url(js_error(e)))?;
    let url = Url::new_with_base(path, &base).map_err(|e| NetError::Url(js_error(e)))?;
    let search = url.search_params();
    search.set(AUTH_FIELD, &params.init_data);
    search.set(GAME_ID_FIELD, &params.game_id);
    Ok(url.href())
}

pub async fn fetch_word(window: &Window, params: &LaunchParams) -> Result<WordResponse, NetError> {
    let url = endpoint_url(window, WORD_PATH, params)?;
    let response = Request::get(&url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    Ok(WordResponse::from_status(status, body))
}

/// Posts one snapshot. Returns the response status; the body is not used.
pub async fn upload_snapshot(
    params: &LaunchParams,
    image: &Blob,
    filename: &str,
) -> Result<u16, NetError> {
    let form = FormData::new().map_err(|e| NetError::Form(js_error(e)))?;
    form.append_with_str(AUTH_FIELD, &params.init_data)
        .map_err(|e| NetError::Form(js_error(e)))?;
    form.append_with_blob_and_filename(IMAGE_FIELD, image, filename)
        .map_err(|e| NetError::Form(js_error(e)))?;
    form.append_with_str(GAME_ID_FIELD, &params.game_id)
        .map_err(|e| NetError::Form(js_error(e)))?;
    let response = Request::post(UPDATE_PATH).body(form)?.send().await?;
    Ok(response.status())
}
