use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while finding, opening or using the serial link
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("No serial ports found")]
    NoDeviceFound,

    #[error("Failed to list serial ports: {0}")]
    Enumerate(#[source] serialport::Error),

    #[error("Failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to acquire serial writer lock")]
    LockPoisoned,
}

/// Startup configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors returned from route handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Serial link error: {0}")]
    Link(#[from] LinkError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
