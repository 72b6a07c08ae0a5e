//! Error types for controller registration, dispatch and view rendering.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;
use vireo_core::CoreError;
use vireo_router::RouteError;

/// Errors raised while the application is being assembled.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A route path is invalid.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// An action name is not a valid identifier.
    #[error("controller {controller}: invalid action name {name:?}")]
    InvalidActionName {
        /// Controller type name.
        controller: String,
        /// The rejected name.
        name: String,
    },

    /// Two actions resolve to the same case-insensitive name.
    #[error("controller {controller}: action {name:?} is registered more than once")]
    DuplicateAction {
        /// Controller type name.
        controller: String,
        /// The conflicting name.
        name: String,
    },

    /// A renderer was registered with an unusable file extension.
    #[error("invalid view file extension {0:?}")]
    InvalidViewExtension(String),
}

/// Failures that cross the run-loop boundary.
///
/// Short-circuit results never become a `DispatchError`; only failures do.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// User code in an action or action hook failed.
    #[error("action {controller}::{action} failed")]
    ActionFailed {
        /// Controller name.
        controller: String,
        /// Action name.
        action: String,
        /// The failure raised by user code.
        #[source]
        source: anyhow::Error,
    },

    /// A view could not be rendered.
    #[error(transparent)]
    View(#[from] ViewError),

    /// An action result could not be applied to the response.
    #[error("failed to apply action result")]
    Response(#[from] CoreError),
}

impl DispatchError {
    /// Renders the error and its whole source chain as plain text.
    #[must_use]
    pub fn render_chain(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        if source.is_some() {
            text.push_str("\n\nCaused by:");
        }
        while let Some(cause) = source {
            let _ = write!(text, "\n    {cause}");
            source = cause.source();
        }
        text
    }
}

/// View rendering failures.
#[derive(Debug, Error)]
pub enum ViewError {
    /// No renderer found a view file for the action.
    #[error("no view file found for {controller}/{action}")]
    ViewFileNotFound {
        /// Controller view directory name.
        controller: String,
        /// View file stem.
        action: String,
    },

    /// The application has no view renderers.
    #[error("no view renderers are registered")]
    NoRenderers,

    /// A renderer rejected the view.
    #[error("failed to render {}: {reason}", file.display())]
    Render {
        /// The view file.
        file: PathBuf,
        /// Why rendering failed.
        reason: String,
    },

    /// The view file could not be read.
    #[error("failed to read view file {}", file.display())]
    Io {
        /// The view file.
        file: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ViewError {
    /// Creates a render error.
    pub fn render(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Render {
            file: file.into(),
            reason: reason.into(),
        }
    }
}
