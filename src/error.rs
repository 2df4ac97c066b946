use wasm_bindgen::JsValue;

/// Failures that can stop the widgets from mounting.
///
/// Optional browser capabilities (pointer capture, clipboard, popups) never
/// produce one of these; they are logged and ignored at the call site.
#[derive(Debug, thiserror::Error)]
pub enum BuddyError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("js error: {0}")]
    Js(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl From<JsValue> for BuddyError {
    fn from(value: JsValue) -> Self {
        BuddyError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<BuddyError> for JsValue {
    fn from(err: BuddyError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
