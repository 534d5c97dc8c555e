//! Custom error types for the authentication flow

use common::error::{ApiError, SessionError};
use thiserror::Error;

/// Error raised by [`crate::MagicLinkService`]
#[derive(Error, Debug)]
pub enum AuthError {
    /// The email failed local validation; no request was sent
    #[error("{0}")]
    InvalidEmail(String),

    /// The verification token is missing
    #[error("{0}")]
    InvalidToken(String),

    /// The backend rejected the request or could not be reached
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Credentials could not be written to or cleared from the session store
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
