//! Error types for vcc
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad config, client-side validation)
//! - 3: Remote failure (HTTP status, transport, push channel)
//! - 4: Local operation failed (serialization, IO)

use thiserror::Error;

/// Exit codes for the vcc CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const REMOTE_FAILED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for vcc operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Remote failures (exit code 3)
    #[error("Server returned {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Push channel error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    // Operation failures (exit code 4)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) | Error::InvalidConfig(_) | Error::Validation(_) => {
                exit_codes::USER_ERROR
            }

            Error::Http { .. } | Error::Transport(_) | Error::WebSocket(_) => {
                exit_codes::REMOTE_FAILED
            }

            Error::Json(_)
            | Error::TomlParse(_)
            | Error::Io(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured payload for the JSON error envelope
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Http { status, url } => Some(serde_json::json!({
                "status": status,
                "url": url,
            })),
            _ => None,
        }
    }
}

/// Result type alias for vcc operations
pub type Result<T> = std::result::Result<T, Error>;
