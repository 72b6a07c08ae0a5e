//! Controllers and the action lifecycle.
//!
//! A controller is created fresh for every request it handles. Dispatch
//! resolves the action, runs `on_pre_action_event`, the action itself and
//! `on_post_action_event`, then applies whatever result survives:
//!
//! - a result from the pre-action hook skips the action body (and, unless
//!   [`Controller::runs_post_action_after_interrupt`] says otherwise, the
//!   post-action hook);
//! - a result from the post-action hook replaces the action's result;
//! - [`ActionError::Interrupt`] anywhere behaves exactly like returning
//!   that result;
//! - [`ActionError::Failure`] aborts dispatch with
//!   [`DispatchError::ActionFailed`].

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use vireo_core::{ActionError, ActionOutcome, ActionResult, Request, Response};

use crate::action::{ActionTable, BoundAction};
use crate::application::Application;
use crate::context::ActionContext;
use crate::error::{ConfigurationError, DispatchError};
use crate::output::ActionOutput;
use crate::view;

/// Action used when the route yields an empty action name.
pub const INDEX_ACTION: &str = "index";

/// Action tried when the requested one does not resolve.
pub const DEFAULT_ACTION: &str = "default";

/// A controller: a set of actions plus optional hooks around them.
///
/// # Example
///
/// ```
/// use vireo_mvc::{ActionContext, ActionTable, Controller};
///
/// #[derive(Default)]
/// struct GreetingController;
///
/// impl GreetingController {
///     fn index(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
///         "Hello World!"
///     }
///
///     fn hello(&mut self, _ctx: &mut ActionContext<'_>, name: String) -> String {
///         format!("Hello {name}!")
///     }
/// }
///
/// impl Controller for GreetingController {
///     fn register(actions: &mut ActionTable<Self>) {
///         actions.add("index", Self::index).add("hello", Self::hello);
///     }
/// }
///
/// assert_eq!(GreetingController.name(), "Greeting");
/// ```
pub trait Controller: Send + 'static {
    /// Registers this controller's actions. Called once per controller
    /// type when the application is built.
    fn register(actions: &mut ActionTable<Self>)
    where
        Self: Sized;

    /// View directory name: the type name without its module path and
    /// without a trailing `Controller`.
    fn name(&self) -> &str {
        controller_name(type_name::<Self>())
    }

    /// Whether action names must match their registered case exactly.
    fn action_names_case_sensitive(&self) -> bool {
        false
    }

    /// Whether the post-action hook still runs after the pre-action hook
    /// produced a result.
    fn runs_post_action_after_interrupt(&self) -> bool {
        false
    }

    /// Runs before the action. A result skips the action.
    fn on_pre_action_event(
        &mut self,
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome<Option<ActionResult>> {
        let _ = ctx;
        Ok(None)
    }

    /// Runs after the action. A result replaces the action's result.
    fn on_post_action_event(
        &mut self,
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome<Option<ActionResult>> {
        let _ = ctx;
        Ok(None)
    }
}

/// Strips the module path, generic arguments and a trailing `Controller`
/// from a type name.
///
/// ```
/// use vireo_mvc::controller_name;
///
/// assert_eq!(controller_name("app::controllers::HomeController"), "Home");
/// assert_eq!(controller_name("Wrapper<app::Inner>"), "Wrapper");
/// assert_eq!(controller_name("Controller"), "Controller");
/// ```
#[must_use]
pub fn controller_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let base = base.rsplit("::").next().unwrap_or(base);
    match base.strip_suffix("Controller") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => base,
    }
}

/// Processes one request with `controller`.
///
/// An empty `action` means [`INDEX_ACTION`]. If the action does not
/// resolve or its parameters do not fit, [`DEFAULT_ACTION`] is tried with
/// the original action name prepended to the parameters. Returns
/// `Ok(false)` when neither was handled.
pub fn process_request<C: Controller>(
    controller: &mut C,
    actions: &ActionTable<C>,
    ctx: &mut ActionContext<'_>,
    action: &str,
    parameters: &[String],
) -> Result<bool, DispatchError> {
    let resolved = if action.is_empty() { INDEX_ACTION } else { action };
    if try_invoke_action(controller, actions, ctx, resolved, parameters)? {
        return Ok(true);
    }

    let mut fallback = Vec::with_capacity(parameters.len() + 1);
    fallback.push(action.to_string());
    fallback.extend_from_slice(parameters);
    debug!(
        controller = ctx.controller_name(),
        action, "action not resolved, trying default action"
    );
    try_invoke_action(controller, actions, ctx, DEFAULT_ACTION, &fallback)
}

/// Resolves, binds and runs one action, applying its result.
///
/// Returns `Ok(false)` if the action does not resolve or the parameters do
/// not fit; nothing runs in that case.
pub fn try_invoke_action<C: Controller>(
    controller: &mut C,
    actions: &ActionTable<C>,
    ctx: &mut ActionContext<'_>,
    action: &str,
    parameters: &[String],
) -> Result<bool, DispatchError> {
    let case_sensitive = controller.action_names_case_sensitive();
    let Some((registered, bound)) = actions.bind(action, case_sensitive, parameters) else {
        if actions.resolves(action, case_sensitive) {
            debug!(
                controller = ctx.controller_name(),
                action,
                parameters = parameters.len(),
                "parameters do not match action"
            );
        }
        return Ok(false);
    };

    ctx.set_action(action, registered);
    let output = run_lifecycle(controller, ctx, bound).map_err(|source| {
        DispatchError::ActionFailed {
            controller: ctx.controller_name().to_string(),
            action: action.to_string(),
            source,
        }
    })?;
    handle_result(ctx, output)?;
    Ok(true)
}

fn run_lifecycle<C: Controller>(
    controller: &mut C,
    ctx: &mut ActionContext<'_>,
    bound: BoundAction<'_, C>,
) -> Result<ActionOutput, anyhow::Error> {
    let pre = match controller.on_pre_action_event(ctx) {
        Ok(result) => result,
        Err(ActionError::Interrupt(result)) => Some(result),
        Err(ActionError::Failure(error)) => return Err(error),
    };

    let mut output = match pre {
        Some(result) => {
            debug!(action = ctx.action_name(), "pre-action event produced a result");
            if !controller.runs_post_action_after_interrupt() {
                return Ok(ActionOutput::Result(result));
            }
            ActionOutput::Result(result)
        }
        None => match bound(controller, ctx) {
            Ok(output) => output,
            Err(ActionError::Interrupt(result)) => ActionOutput::Result(result),
            Err(ActionError::Failure(error)) => return Err(error),
        },
    };

    match controller.on_post_action_event(ctx) {
        Ok(Some(result)) | Err(ActionError::Interrupt(result)) => {
            debug!(action = ctx.action_name(), "post-action event replaced the result");
            output = ActionOutput::Result(result);
        }
        Ok(None) => {}
        Err(ActionError::Failure(error)) => return Err(error),
    }

    Ok(output)
}

/// Applies an action's output to the response in `ctx`.
pub fn handle_result(ctx: &mut ActionContext<'_>, output: ActionOutput) -> Result<(), DispatchError> {
    match output {
        ActionOutput::Empty => {}
        ActionOutput::Content(content) => ctx.response_mut().set_content(content),
        ActionOutput::Result(result) => {
            let request = ctx.request();
            result.update_response(request, ctx.response_mut())?;
        }
        ActionOutput::View(view) => {
            let content = view::render(
                ctx.application(),
                ctx.controller_name(),
                ctx.action_name(),
                &view,
                ctx.view_items(),
            )?;
            ctx.response_mut().set_content(content);
        }
    }
    Ok(())
}

/// What a controller did with one request.
pub(crate) struct Processed {
    /// Whether an action handled the request, or the failure.
    pub(crate) handled: Result<bool, DispatchError>,
    /// Registered name of the action that ran, if one resolved.
    pub(crate) action: Option<String>,
}

trait ErasedController: Send + Sync {
    fn name(&self) -> &str;

    fn process(
        &self,
        application: &Application,
        request: &Request,
        response: &mut Response,
        action: &str,
        parameters: &[String],
        error: Option<&DispatchError>,
    ) -> Processed;
}

struct Registration<C, F> {
    factory: F,
    actions: ActionTable<C>,
}

impl<C, F> ErasedController for Registration<C, F>
where
    C: Controller,
    F: Fn() -> C + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.actions.controller()
    }

    fn process(
        &self,
        application: &Application,
        request: &Request,
        response: &mut Response,
        action: &str,
        parameters: &[String],
        error: Option<&DispatchError>,
    ) -> Processed {
        let mut controller = (self.factory)();
        let name = controller.name().to_string();
        let mut ctx = ActionContext::new(application, request, response, name, error);
        let handled = process_request(&mut controller, &self.actions, &mut ctx, action, parameters);
        Processed {
            handled,
            action: ctx.registered_action().map(str::to_string),
        }
    }
}

/// A registered controller type: its action table plus a factory producing
/// a fresh instance per request.
#[derive(Clone)]
pub struct ControllerHandle {
    inner: Arc<dyn ErasedController>,
}

impl ControllerHandle {
    /// Registers controller `C`, created with `C::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if an action registration is invalid.
    pub fn new<C: Controller + Default>() -> Result<Self, ConfigurationError> {
        Self::with_factory(C::default)
    }

    /// Registers controller `C`, created by `factory`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if an action registration is invalid.
    pub fn with_factory<C, F>(factory: F) -> Result<Self, ConfigurationError>
    where
        C: Controller,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let mut actions = ActionTable::new(controller_name(type_name::<C>()));
        C::register(&mut actions);
        let actions = actions.finish()?;
        Ok(Self {
            inner: Arc::new(Registration { factory, actions }),
        })
    }

    /// Returns the controller's type-derived name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Creates a controller and processes the request with it.
    ///
    /// Returns `Ok(false)` if no action handled the request.
    pub fn process_request(
        &self,
        application: &Application,
        request: &Request,
        response: &mut Response,
        action: &str,
        parameters: &[String],
    ) -> Result<bool, DispatchError> {
        self.dispatch(application, request, response, action, parameters)
            .handled
    }

    pub(crate) fn dispatch(
        &self,
        application: &Application,
        request: &Request,
        response: &mut Response,
        action: &str,
        parameters: &[String],
    ) -> Processed {
        self.inner
            .process(application, request, response, action, parameters, None)
    }

    pub(crate) fn process_error(
        &self,
        application: &Application,
        request: &Request,
        response: &mut Response,
        error: Option<&DispatchError>,
    ) -> Result<bool, DispatchError> {
        let action = response.status_code().code().to_string();
        self.inner
            .process(application, request, response, &action, &[], error)
            .handled
    }
}

impl fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("name", &self.name())
            .finish()
    }
}
