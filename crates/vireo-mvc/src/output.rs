//! What actions return.

use vireo_core::{ActionError, ActionOutcome, ActionResult};

use crate::view::View;

/// The normal return value of an action.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionOutput {
    /// Leave the response untouched.
    #[default]
    Empty,
    /// Replace the response content; the status is kept.
    Content(String),
    /// Apply an action result.
    Result(ActionResult),
    /// Render a view into the response content.
    View(View),
}

impl From<()> for ActionOutput {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl From<String> for ActionOutput {
    fn from(content: String) -> Self {
        Self::Content(content)
    }
}

impl From<&str> for ActionOutput {
    fn from(content: &str) -> Self {
        Self::Content(content.to_string())
    }
}

impl From<ActionResult> for ActionOutput {
    fn from(result: ActionResult) -> Self {
        Self::Result(result)
    }
}

impl From<View> for ActionOutput {
    fn from(view: View) -> Self {
        Self::View(view)
    }
}

impl<T: Into<ActionOutput>> From<Option<T>> for ActionOutput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Return types accepted from action functions.
///
/// Implemented for everything that converts into [`ActionOutput`], and for
/// `Result`s of those whose error converts into [`ActionError`].
pub trait IntoActionOutcome {
    /// Converts the return value.
    fn into_action_outcome(self) -> ActionOutcome<ActionOutput>;
}

macro_rules! impl_into_outcome {
    ($($ty:ty),*) => {
        $(
            impl IntoActionOutcome for $ty {
                fn into_action_outcome(self) -> ActionOutcome<ActionOutput> {
                    Ok(self.into())
                }
            }
        )*
    };
}

impl_into_outcome!((), String, &str, ActionResult, View, ActionOutput);

impl<T: Into<ActionOutput>> IntoActionOutcome for Option<T> {
    fn into_action_outcome(self) -> ActionOutcome<ActionOutput> {
        Ok(self.into())
    }
}

impl<T, E> IntoActionOutcome for Result<T, E>
where
    T: Into<ActionOutput>,
    E: Into<ActionError>,
{
    fn into_action_outcome(self) -> ActionOutcome<ActionOutput> {
        self.map(Into::into).map_err(Into::into)
    }
}
