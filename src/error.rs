use std::fmt;
use wasm_bindgen::JsValue;

/// Errors raised by the DOM and storage adapters.
///
/// None of these ever reach the page: handlers log them and carry on.
#[derive(Debug)]
pub enum UiError {
    /// A JavaScript exception, rendered with `Debug`.
    Js(String),
    /// `localStorage` is disabled or the window has none.
    StorageUnavailable,
    /// Snapshot (de)serialization failed.
    Serialize(String),
    /// An element exists but is not of the expected interface.
    UnexpectedElement(String),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::Js(msg) => write!(f, "JavaScript error: {}", msg),
            UiError::StorageUnavailable => write!(f, "localStorage is not available"),
            UiError::Serialize(msg) => write!(f, "Failed to (de)serialize state: {}", msg),
            UiError::UnexpectedElement(what) => {
                write!(f, "Element {} has an unexpected type", what)
            }
        }
    }
}

impl std::error::Error for UiError {}

impl From<JsValue> for UiError {
    fn from(value: JsValue) -> Self {
        UiError::Js(format!("{:?}", value))
    }
}

impl From<serde_json::Error> for UiError {
    fn from(err: serde_json::Error) -> Self {
        UiError::Serialize(err.to_string())
    }
}
