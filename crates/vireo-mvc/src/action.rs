//! Action registration and lookup.
//!
//! Each controller type registers its actions once, by name, into an
//! [`ActionTable`]. Lookup is case-insensitive unless the controller asks
//! for case-sensitive names, and action names starting with a digit are
//! stored and looked up with a leading underscore, so `"404"` and `"_404"`
//! name the same action.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use vireo_core::ActionOutcome;

use crate::context::ActionContext;
use crate::error::ConfigurationError;
use crate::output::{ActionOutput, IntoActionOutcome};
use crate::param::ActionParam;

/// An action whose parameters have been converted, ready to run.
pub type BoundAction<'a, C> =
    Box<dyn FnOnce(&mut C, &mut ActionContext<'_>) -> ActionOutcome<ActionOutput> + 'a>;

/// A function usable as an action of controller `C`.
///
/// Implemented for functions taking `&mut C`, `&mut ActionContext` and up
/// to six [`ActionParam`] arguments, returning anything that implements
/// [`IntoActionOutcome`]. `Args` is the tuple of parameter types and only
/// serves to tell the implementations apart.
pub trait Action<C, Args>: Send + Sync + 'static {
    /// Converts `parameters` into this action's arguments.
    ///
    /// Returns `None` when there are more parameters than arguments, a
    /// parameter does not convert, or a required argument is missing.
    fn bind<'a>(&'a self, parameters: &[String]) -> Option<BoundAction<'a, C>>;
}

fn boxed<'a, C, G>(bound: G) -> BoundAction<'a, C>
where
    G: FnOnce(&mut C, &mut ActionContext<'_>) -> ActionOutcome<ActionOutput> + 'a,
{
    Box::new(bound)
}

macro_rules! one {
    ($t:ident) => {
        1
    };
}

macro_rules! impl_action {
    ($($ty:ident $var:ident),*) => {
        impl<C, F, R, $($ty,)*> Action<C, ($($ty,)*)> for F
        where
            C: 'static,
            F: Fn(&mut C, &mut ActionContext<'_>, $($ty,)*) -> R + Send + Sync + 'static,
            R: IntoActionOutcome,
            $($ty: ActionParam + 'static,)*
        {
            #[allow(unused_mut, unused_variables, clippy::identity_op)]
            fn bind<'a>(&'a self, parameters: &[String]) -> Option<BoundAction<'a, C>> {
                let declared: usize = 0 $(+ one!($ty))*;
                if parameters.len() > declared {
                    return None;
                }

                let mut supplied = parameters.iter();
                $(
                    let $var = match supplied.next() {
                        Some(segment) => <$ty as ActionParam>::from_segment(segment)?,
                        None => <$ty as ActionParam>::missing()?,
                    };
                )*

                Some(boxed(move |controller, ctx| {
                    (self)(controller, ctx, $($var,)*).into_action_outcome()
                }))
            }
        }
    };
}

impl_action!();
impl_action!(A1 a1);
impl_action!(A1 a1, A2 a2);
impl_action!(A1 a1, A2 a2, A3 a3);
impl_action!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_action!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_action!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);

trait ErasedAction<C>: Send + Sync {
    fn bind<'a>(&'a self, parameters: &[String]) -> Option<BoundAction<'a, C>>;
}

struct Erased<A, Args> {
    action: A,
    _args: PhantomData<fn() -> Args>,
}

impl<C, A, Args> ErasedAction<C> for Erased<A, Args>
where
    A: Action<C, Args>,
{
    fn bind<'a>(&'a self, parameters: &[String]) -> Option<BoundAction<'a, C>> {
        self.action.bind(parameters)
    }
}

struct Entry<C> {
    name: String,
    action: Box<dyn ErasedAction<C>>,
}

/// Returns the name an action is stored under: a leading digit gains an
/// underscore prefix.
///
/// ```
/// use vireo_mvc::action_method_name;
///
/// assert_eq!(action_method_name("404"), "_404");
/// assert_eq!(action_method_name("index"), "index");
/// assert_eq!(action_method_name(""), "");
/// ```
#[must_use]
pub fn action_method_name(action: &str) -> Cow<'_, str> {
    if action.starts_with(|c: char| c.is_ascii_digit()) {
        Cow::Owned(format!("_{action}"))
    } else {
        Cow::Borrowed(action)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The actions of one controller type.
pub struct ActionTable<C> {
    controller: String,
    entries: HashMap<String, Entry<C>>,
    error: Option<ConfigurationError>,
}

impl<C: 'static> ActionTable<C> {
    /// Creates an empty table for the controller named `controller`.
    #[must_use]
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            entries: HashMap::new(),
            error: None,
        }
    }

    /// Registers `action` under `name`.
    ///
    /// Invalid or duplicate names are reported when the table is finished
    /// (see [`ActionTable::finish`]); the first problem wins.
    pub fn add<Args, A>(&mut self, name: &str, action: A) -> &mut Self
    where
        Args: 'static,
        A: Action<C, Args>,
    {
        let name = action_method_name(name).into_owned();
        if !is_identifier(&name) {
            self.fail(ConfigurationError::InvalidActionName {
                controller: self.controller.clone(),
                name,
            });
            return self;
        }

        let key = name.to_lowercase();
        if self.entries.contains_key(&key) {
            self.fail(ConfigurationError::DuplicateAction {
                controller: self.controller.clone(),
                name,
            });
            return self;
        }

        self.entries.insert(
            key,
            Entry {
                name,
                action: Box::new(Erased {
                    action,
                    _args: PhantomData,
                }),
            },
        );
        self
    }

    fn fail(&mut self, error: ConfigurationError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Returns true if an action resolves under `name`, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name, false).is_some()
    }

    /// Returns the registered names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.name.as_str())
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the controller name the table was created for.
    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Returns the table, or the first registration problem.
    pub fn finish(mut self) -> Result<Self, ConfigurationError> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }

    fn lookup(&self, action: &str, case_sensitive: bool) -> Option<&Entry<C>> {
        let name = action_method_name(action);
        let entry = self.entries.get(&name.to_lowercase())?;
        (!case_sensitive || entry.name == name).then_some(entry)
    }

    /// Resolves `action` and binds `parameters` to it, returning the
    /// registered name alongside the bound action.
    ///
    /// Returns `None` if no action resolves or the parameters do not fit.
    pub(crate) fn bind(
        &self,
        action: &str,
        case_sensitive: bool,
        parameters: &[String],
    ) -> Option<(&str, BoundAction<'_, C>)> {
        let entry = self.lookup(action, case_sensitive)?;
        let bound = entry.action.bind(parameters)?;
        Some((entry.name.as_str(), bound))
    }

    /// Returns true if `action` resolves, honoring case sensitivity.
    pub(crate) fn resolves(&self, action: &str, case_sensitive: bool) -> bool {
        self.lookup(action, case_sensitive).is_some()
    }
}

impl<C> fmt::Debug for ActionTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.values().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        f.debug_struct("ActionTable")
            .field("controller", &self.controller)
            .field("actions", &names)
            .finish()
    }
}
