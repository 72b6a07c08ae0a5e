//! The application and its request run-loop.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, field, info_span, warn};
use vireo_config::{ApplicationSection, DEFAULT_VIEW_DIR};
use vireo_core::{CustomItems, Request, Response, StatusCode};
use vireo_router::{RequestPath, Route, RouteTable};
use vireo_telemetry::metrics::{self as telemetry, InFlightGuard, UNHANDLED, UNMATCHED};

use crate::controller::{Controller, ControllerHandle};
use crate::error::{ConfigurationError, DispatchError};
use crate::plugin::Plugin;
use crate::view::ViewRenderer;

/// A configured application.
///
/// Assemble one with [`Application::builder`], then call
/// [`Application::run`] (or [`Application::handle`]) once per request.
/// The application is read-only after it is built and can be shared
/// between threads.
///
/// # Example
///
/// ```
/// use vireo_core::Request;
/// use vireo_mvc::{ActionContext, ActionTable, Application, Controller};
///
/// #[derive(Default)]
/// struct HomeController;
///
/// impl HomeController {
///     fn index(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
///         "Hello World!"
///     }
/// }
///
/// impl Controller for HomeController {
///     fn register(actions: &mut ActionTable<Self>) {
///         actions.add("index", Self::index);
///     }
/// }
///
/// let application = Application::builder()
///     .route::<HomeController>("")
///     .build()
///     .unwrap();
///
/// let response = application.handle(Request::get("http://localhost/").unwrap());
/// assert_eq!(response.status_code().code(), 200);
/// assert_eq!(response.content(), "Hello World!");
/// ```
pub struct Application {
    document_root: PathBuf,
    view_path: PathBuf,
    debug: bool,
    routes: RouteTable<ControllerHandle>,
    view_renderers: Vec<Arc<dyn ViewRenderer>>,
    plugins: Vec<Arc<dyn Plugin>>,
    error_controller: Option<ControllerHandle>,
    custom_items: CustomItems,
}

/// Outcome of the dispatch phase, for logging and metrics.
///
/// `action` is the registered action name, or [`UNHANDLED`], so metric
/// labels never carry raw URL segments.
struct Dispatched {
    controller: String,
    action: String,
}

impl Application {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Returns the document root.
    #[must_use]
    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Returns the view directory.
    #[must_use]
    pub fn view_path(&self) -> &Path {
        &self.view_path
    }

    /// Returns true in debug mode.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Returns the route table.
    #[must_use]
    pub const fn routes(&self) -> &RouteTable<ControllerHandle> {
        &self.routes
    }

    /// Returns the view renderers in registration order.
    #[must_use]
    pub fn view_renderers(&self) -> &[Arc<dyn ViewRenderer>] {
        &self.view_renderers
    }

    /// Returns the plugins in registration order.
    #[must_use]
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Returns the error controller, if configured.
    #[must_use]
    pub const fn error_controller(&self) -> Option<&ControllerHandle> {
        self.error_controller.as_ref()
    }

    /// Returns the application's custom items.
    #[must_use]
    pub const fn custom_items(&self) -> &CustomItems {
        &self.custom_items
    }

    /// Processes `request` into a fresh response.
    pub fn handle(&self, mut request: Request) -> Response {
        let mut response = Response::new();
        self.run(&mut request, &mut response);
        response
    }

    /// Runs one request through plugins, routing, dispatch and error
    /// handling, leaving the outcome in `response`.
    pub fn run(&self, request: &mut Request, response: &mut Response) {
        let started = Instant::now();
        let _in_flight = InFlightGuard::new();
        let span = info_span!(
            "request",
            request_id = %request.id(),
            request.method = %request.method(),
            request.path = %request.path(),
            controller = field::Empty,
            action = field::Empty,
            status = field::Empty,
        );
        let _entered = span.enter();

        let mut dispatched = None;
        if self.run_pre_request_plugins(request, response) {
            telemetry::record_plugin_stop("pre");
        } else {
            dispatched = self.dispatch(request, response);
            self.run_post_request_plugins(request, response);
        }

        let status = response.status_code();
        span.record("status", status.code());
        let (controller, action) = dispatched
            .as_ref()
            .map_or((UNMATCHED, ""), |d| (d.controller.as_str(), d.action.as_str()));
        telemetry::record_request(controller, action, status.code(), started.elapsed());
        debug!(status = status.code(), "request finished");
    }

    fn run_pre_request_plugins(&self, request: &mut Request, response: &mut Response) -> bool {
        for plugin in &self.plugins {
            if plugin.on_pre_request(self, request, response) {
                debug!(plugin = plugin.name(), "plugin stopped the request before dispatch");
                return true;
            }
        }
        false
    }

    fn run_post_request_plugins(&self, request: &Request, response: &mut Response) {
        for plugin in &self.plugins {
            if plugin.on_post_request(self, request, response) {
                debug!(plugin = plugin.name(), "plugin stopped post-request processing");
                telemetry::record_plugin_stop("post");
                return;
            }
        }
    }

    fn dispatch(&self, request: &Request, response: &mut Response) -> Option<Dispatched> {
        let path = RequestPath::parse(request.path());
        let mut dispatched = None;
        let mut failure = None;

        match self.routes.match_path(&path) {
            Some(matched) => {
                let controller = matched.target.name().to_string();
                let span = tracing::Span::current();
                span.record("controller", controller.as_str());
                span.record("action", matched.action.as_str());
                debug!(
                    controller = controller.as_str(),
                    action = matched.action.as_str(),
                    parameters = matched.parameters.len(),
                    "route matched"
                );

                let processed = matched.target.dispatch(
                    self,
                    request,
                    response,
                    &matched.action,
                    &matched.parameters,
                );
                match processed.handled {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!(controller = controller.as_str(), "action not handled");
                        response.set_status_code(StatusCode::NOT_FOUND);
                    }
                    Err(err) => {
                        error!(error = %err, "request dispatch failed");
                        response.set_status_code(StatusCode::INTERNAL_SERVER_ERROR);
                        response.set_content("");
                        failure = Some(err);
                    }
                }

                dispatched = Some(Dispatched {
                    controller,
                    action: processed.action.unwrap_or_else(|| UNHANDLED.to_string()),
                });
            }
            None => {
                debug!("no route matched");
                response.set_status_code(StatusCode::NOT_FOUND);
            }
        }

        if response.status_code().is_error() {
            self.handle_error(request, response, failure.as_ref());
        }

        dispatched
    }

    fn handle_error(
        &self,
        request: &Request,
        response: &mut Response,
        failure: Option<&DispatchError>,
    ) {
        if let Some(error_controller) = &self.error_controller {
            telemetry::record_error_dispatch(response.status_code().code());
            debug!(
                controller = error_controller.name(),
                status = response.status_code().code(),
                "dispatching to error controller"
            );
            match error_controller.process_error(self, request, response, failure) {
                Ok(true) => return,
                Ok(false) => {}
                Err(err) => {
                    warn!(error = %err, "error controller failed");
                    response.set_status_code(StatusCode::INTERNAL_SERVER_ERROR);
                    response.set_content("");
                    return;
                }
            }
        }

        if let Some(failure) = failure {
            if self.debug {
                response.set_content(failure.render_chain());
            }
        }
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("document_root", &self.document_root)
            .field("view_path", &self.view_path)
            .field("debug", &self.debug)
            .field("routes", &self.routes.len())
            .field("view_renderers", &self.view_renderers.len())
            .field("plugins", &self.plugins.len())
            .field("error_controller", &self.error_controller)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Application`].
///
/// Registration problems are remembered and reported by
/// [`build`](Self::build); the first one wins.
#[derive(Default)]
pub struct ApplicationBuilder {
    document_root: Option<PathBuf>,
    view_path: Option<PathBuf>,
    debug: bool,
    routes: RouteTable<ControllerHandle>,
    view_renderers: Vec<Arc<dyn ViewRenderer>>,
    plugins: Vec<Arc<dyn Plugin>>,
    error_controller: Option<ControllerHandle>,
    custom_items: CustomItems,
    error: Option<ConfigurationError>,
}

impl ApplicationBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the `[application]` configuration section.
    #[must_use]
    pub fn with_config(mut self, section: &ApplicationSection) -> Self {
        self.document_root = Some(section.document_root.clone());
        self.view_path = section.view_path.clone();
        self.debug = section.debug;
        self
    }

    /// Sets the document root. Defaults to `.`.
    #[must_use]
    pub fn document_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_root = Some(path.into());
        self
    }

    /// Sets the view directory. Relative paths are taken from the document
    /// root; the default is `<document root>/Views`.
    #[must_use]
    pub fn view_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.view_path = Some(path.into());
        self
    }

    /// Enables or disables debug mode.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Adds a route to controller `C`. Routes are tried in the order added.
    #[must_use]
    pub fn route<C: Controller + Default>(self, path: &str) -> Self {
        self.route_with(path, C::default)
    }

    /// Adds a route to a controller created by `factory`.
    #[must_use]
    pub fn route_with<C, F>(mut self, path: &str, factory: F) -> Self
    where
        C: Controller,
        F: Fn() -> C + Send + Sync + 'static,
    {
        if self.error.is_some() {
            return self;
        }
        let route = ControllerHandle::with_factory(factory)
            .and_then(|handle| Route::new(path, handle).map_err(ConfigurationError::from));
        match route {
            Ok(route) => self.routes.push(route),
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Adds a view renderer. Renderers are tried in the order added.
    #[must_use]
    pub fn renderer(mut self, renderer: impl ViewRenderer + 'static) -> Self {
        let extension = renderer.view_file_extension();
        if extension.is_empty() || extension.contains(['.', '/', '\\']) {
            if self.error.is_none() {
                self.error = Some(ConfigurationError::InvalidViewExtension(
                    extension.to_string(),
                ));
            }
            return self;
        }
        self.view_renderers.push(Arc::new(renderer));
        self
    }

    /// Adds a plugin. Plugins run in the order added.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Sets the error controller, created with `C::default()`.
    #[must_use]
    pub fn error_controller<C: Controller + Default>(self) -> Self {
        self.error_controller_with(C::default)
    }

    /// Sets the error controller, created by `factory`.
    #[must_use]
    pub fn error_controller_with<C, F>(mut self, factory: F) -> Self
    where
        C: Controller,
        F: Fn() -> C + Send + Sync + 'static,
    {
        match ControllerHandle::with_factory(factory) {
            Ok(handle) => self.error_controller = Some(handle),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
        self
    }

    /// Stores a named custom item.
    #[must_use]
    pub fn custom_item<T: Send + Sync + 'static>(mut self, name: impl Into<String>, value: T) -> Self {
        self.custom_items.set(name, value);
        self
    }

    /// Stores a type-keyed custom item.
    #[must_use]
    pub fn insert_item<T: Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        self.custom_items.insert(value);
        self
    }

    /// Builds the application.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] recorded while routes,
    /// renderers or the error controller were registered.
    pub fn build(self) -> Result<Application, ConfigurationError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let document_root = self.document_root.unwrap_or_else(|| PathBuf::from("."));
        let view_path = match self.view_path {
            Some(path) if path.is_absolute() => path,
            Some(path) => document_root.join(path),
            None => document_root.join(DEFAULT_VIEW_DIR),
        };

        Ok(Application {
            document_root,
            view_path,
            debug: self.debug,
            routes: self.routes,
            view_renderers: self.view_renderers,
            plugins: self.plugins,
            error_controller: self.error_controller,
            custom_items: self.custom_items,
        })
    }
}

impl fmt::Debug for ApplicationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationBuilder")
            .field("routes", &self.routes.len())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
