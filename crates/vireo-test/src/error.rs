//! Test error types.

use thiserror::Error;
use vireo_core::CoreError;

/// Errors that can occur while building or inspecting test requests.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be built.
    #[error("request build error: {0}")]
    RequestBuild(#[from] CoreError),

    /// The response body is not what was expected.
    #[error("body read error: {0}")]
    BodyRead(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
