//! Errors from talking to a remote collection.

use thiserror::Error;

/// Failure of a remote write or of the standing listener.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("remote rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("listener error: {0}")]
    Listen(String),

    #[error("listener connection closed")]
    Closed,

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Engine(#[from] listy_engine::Error),
}

/// Result type for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
