//! Custom error types for the common library
//!
//! This module defines the error taxonomy shared by the client crates:
//! failures talking to the remote API, failures of the persistent session
//! store, and configuration failures.

use thiserror::Error;

/// Error returned by [`crate::http::ApiClient`]
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("{message}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// Message extracted from the error body
        message: String,
    },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A 2xx response whose body did not match the expected shape
    #[error("Unexpected response body ({status}): {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
        }
    }

    /// True for the benign "resource does not exist yet" answer
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Error type for session store operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing the backing file failed
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a valid session document
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The in-memory store lock was poisoned by a panicking writer
    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not usable
    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Render an error for display, substituting `fallback` when the error
/// carries no text of its own.
pub fn user_message(err: &dyn std::fmt::Display, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
