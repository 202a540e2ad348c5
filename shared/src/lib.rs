use serde::{Deserialize, Serialize};

pub mod i18n;

pub const WORD_PATH: &str = "/web/app/word";
pub const UPDATE_PATH: &str = "/web/app/update";
pub const EVENTS_PATH: &str = "/web/app/events";

pub const AUTH_FIELD: &str = "_auth";
pub const GAME_ID_FIELD: &str = "gameId";
pub const IMAGE_FIELD: &str = "image";

/// Named event carrying the secret word on the push channel.
pub const WORD_EVENT: &str = "word";
/// Named event carrying a reason key on the push channel.
pub const ERROR_EVENT: &str = "error";

/// Reason a game screen was shut down, as sent by the server.
///
/// The server speaks in localization keys; anything it sends that we don't
/// know about is kept verbatim so it can still be shown.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ErrorReason {
    NotAuth,
    NotHost,
    Ended,
    AlreadyConnected,
    Error,
    Other(String),
}

impl ErrorReason {
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "not_auth" => ErrorReason::NotAuth,
            "not_host" => ErrorReason::NotHost,
            "ended" => ErrorReason::Ended,
            "already_connected" => ErrorReason::AlreadyConnected,
            "error" | "" => ErrorReason::Error,
            other => ErrorReason::Other(other.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ErrorReason::NotAuth => "not_auth",
            ErrorReason::NotHost => "not_host",
            ErrorReason::Ended => "ended",
            ErrorReason::AlreadyConnected => "already_connected",
            ErrorReason::Error => "error",
            ErrorReason::Other(key) => key,
        }
    }
}

impl From<String> for ErrorReason {
    fn from(key: String) -> Self {
        ErrorReason::from_key(&key)
    }
}

impl From<ErrorReason> for String {
    fn from(reason: ErrorReason) -> Self {
        reason.key().to_string()
    }
}

/// One message received on the push channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushEvent {
    Word(String),
    Terminated(ErrorReason),
}

impl PushEvent {
    /// Maps an event type and its text payload to a push event.
    ///
    /// `word` reveals the word; `error` and the unnamed `message` type both
    /// carry a reason key. Other event types are not part of the protocol.
    pub fn parse(event_type: &str, data: &str) -> Option<Self> {
        match event_type {
            WORD_EVENT => Some(PushEvent::Word(data.to_string())),
            ERROR_EVENT | "message" => Some(PushEvent::Terminated(ErrorReason::from_key(data))),
            _ => None,
        }
    }
}
