//! The signal actions raise instead of returning normally.
//!
//! An action, or a hook around it, either short-circuits with a complete
//! [`ActionResult`] or fails. Both travel through `Err` so `?` works for
//! each:
//!
//! ```
//! use vireo_core::{ActionError, ActionOutcome, ActionResult};
//!
//! fn show(id: &str) -> ActionOutcome<String> {
//!     let id: u32 = id.parse()?; // failure
//!     if id == 0 {
//!         return Err(ActionResult::not_found("Page was not found").into()); // short-circuit
//!     }
//!     Ok(format!("item {id}"))
//! }
//!
//! assert!(matches!(show("0"), Err(ActionError::Interrupt(_))));
//! assert!(matches!(show("x"), Err(ActionError::Failure(_))));
//! assert_eq!(show("7").unwrap(), "item 7");
//! ```

use std::fmt;

use crate::result::ActionResult;

/// Result alias used by actions and action hooks.
pub type ActionOutcome<T> = Result<T, ActionError>;

/// Why an action did not return normally.
///
/// This type does not implement [`std::error::Error`]; that keeps the
/// blanket conversion from any error type coherent with the conversion
/// from [`ActionResult`].
#[derive(Debug)]
pub enum ActionError {
    /// Stop processing and respond with this result.
    Interrupt(ActionResult),
    /// Unexpected failure in user code.
    Failure(anyhow::Error),
}

impl ActionError {
    /// Wraps any error-like value as a failure.
    pub fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Returns the carried result for an interrupt.
    #[must_use]
    pub const fn as_interrupt(&self) -> Option<&ActionResult> {
        match self {
            Self::Interrupt(result) => Some(result),
            Self::Failure(_) => None,
        }
    }
}

/// Short-circuits with `result`.
pub fn interrupt<T>(result: ActionResult) -> ActionOutcome<T> {
    Err(ActionError::Interrupt(result))
}

impl From<ActionResult> for ActionError {
    fn from(result: ActionResult) -> Self {
        Self::Interrupt(result)
    }
}

impl<E> From<E> for ActionError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::Failure(anyhow::Error::new(error))
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt(result) => write!(f, "interrupted with {}", result.status_code()),
            Self::Failure(error) => write!(f, "{error}"),
        }
    }
}
