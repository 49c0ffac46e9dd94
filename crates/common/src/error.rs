//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::DecryptionFailed`] → 422
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: empty password, empty text, missing header.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The envelope could not be opened with the supplied password.
    ///
    /// Deliberately does not say whether the password or the data was wrong.
    #[error("{0}")]
    DecryptionFailed(String),

    /// An unexpected internal error occurred. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::DecryptionFailed(_) => 422,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Returns the short machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::DecryptionFailed(_) => "decryption_failed",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
