use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::export::ExportError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}")]
    Http { status: u16 },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("grid api reported: {0}")]
    Api(String),
    #[error("response has no body to stream")]
    MissingBody,
    #[error("stream read failed: {0}")]
    Stream(String),
    #[error("browser call failed: {0}")]
    Dom(String),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<gloo_net::Error> for ViewerError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ViewerError::Decode(e.to_string()),
            other => ViewerError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Decode(err.to_string())
    }
}

impl From<JsValue> for ViewerError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        ViewerError::Dom(msg)
    }
}

impl ViewerError {
    /// Errors that come from the grid endpoint itself are logged only; every
    /// other load failure is surfaced with a blocking alert.
    pub fn is_silent_on_load(&self) -> bool {
        matches!(self, ViewerError::Api(_))
    }
}
