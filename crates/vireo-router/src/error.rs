//! Route configuration errors.

use thiserror::Error;

/// Errors raised while constructing a [`Route`](crate::Route).
///
/// These are configuration errors: they surface when the application is
/// assembled, never while a request is being matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The route path contains an empty segment (e.g. `"a//b"` or `"/a"`).
    #[error("route path \"{path}\" contains an empty segment")]
    EmptySegment {
        /// The offending route path.
        path: String,
    },

    /// A segment contains characters outside `[a-zA-Z0-9._-]`.
    #[error("route path \"{path}\" contains invalid segment \"{segment}\"")]
    InvalidSegment {
        /// The offending route path.
        path: String,
        /// The invalid segment.
        segment: String,
    },
}
