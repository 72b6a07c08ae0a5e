//! Server error types.

use std::net::SocketAddr;

use thiserror::Error;
use vireo_core::CoreError;

/// Errors raised while starting the server or translating requests and
/// responses.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address is not a socket address.
    #[error("invalid bind address {addr:?}: {reason}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Binding the listener failed.
    #[error("failed to bind to {addr}")]
    Bind {
        /// The address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The builder was not given an application.
    #[error("no application configured")]
    MissingApplication,

    /// The wire request could not be turned into a request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request was rejected while it was built.
    #[error(transparent)]
    Request(#[from] CoreError),

    /// The response could not be turned into a wire response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ServerError {
    /// Creates an invalid request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    /// Creates an invalid response error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse(reason.into())
    }
}
