//! Error types for Vireo core values.
//!
//! [`CoreError`] covers the configuration-time failures of core values
//! (status codes, methods, cookie paths, header values) and URL resolution
//! for redirect targets. JSON encoding failures are deliberately kept in a
//! separate type, [`ContentEncodingError`], so callers can tell an encoder
//! failure apart from an invalid argument.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core values.
///
/// # Example
///
/// ```
/// use vireo_core::{CoreError, StatusCode};
///
/// let err = StatusCode::new(999).unwrap_err();
/// assert!(matches!(err, CoreError::InvalidStatusCode(999)));
/// assert_eq!(err.to_string(), "Invalid status code: 999");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The status code is not in the registry.
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u16),

    /// The method string is empty or contains non-alphanumeric characters.
    #[error("Invalid method: \"{0}\"")]
    InvalidMethod(String),

    /// A URL could not be parsed or resolved.
    #[error("Invalid url \"{url}\": {reason}")]
    InvalidUrl {
        /// The offending URL (or relative reference).
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header \"{name}\": {reason}")]
    InvalidHeader {
        /// The header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A cookie path is not an absolute, plain path.
    #[error("Invalid cookie path: \"{0}\"")]
    InvalidCookiePath(String),
}

impl CoreError {
    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Content could not be encoded (currently: JSON serialization failed).
///
/// Carries the underlying encoder's message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Content encoding failed: {message}")]
pub struct ContentEncodingError {
    message: String,
}

impl ContentEncodingError {
    /// Creates a content encoding error with the encoder's message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the encoder's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ContentEncodingError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}
