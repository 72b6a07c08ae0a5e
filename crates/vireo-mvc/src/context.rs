//! Per-request state handed to actions and action hooks.

use serde_json::Value;
use vireo_core::{CustomItems, Request, Response, SessionStore};

use crate::application::Application;
use crate::error::DispatchError;
use crate::view::ViewItems;

/// Everything an action can see and change while it runs.
///
/// A context lives for one controller invocation. The request is
/// read-only; the response is mutable.
#[derive(Debug)]
pub struct ActionContext<'a> {
    application: &'a Application,
    request: &'a Request,
    response: &'a mut Response,
    controller: String,
    action: String,
    registered_action: Option<String>,
    view_items: ViewItems,
    error: Option<&'a DispatchError>,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(
        application: &'a Application,
        request: &'a Request,
        response: &'a mut Response,
        controller: impl Into<String>,
        error: Option<&'a DispatchError>,
    ) -> Self {
        Self {
            application,
            request,
            response,
            controller: controller.into(),
            action: String::new(),
            registered_action: None,
            view_items: ViewItems::new(),
            error,
        }
    }

    /// Returns the application.
    #[must_use]
    pub const fn application(&self) -> &'a Application {
        self.application
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> &'a Request {
        self.request
    }

    /// Returns the response.
    #[must_use]
    pub fn response(&self) -> &Response {
        &*self.response
    }

    /// Returns the response for modification.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut *self.response
    }

    /// Returns the session attached to the request.
    #[must_use]
    pub fn session(&self) -> &'a dyn SessionStore {
        self.request.session()
    }

    /// Returns the application's custom items.
    #[must_use]
    pub fn application_items(&self) -> &'a CustomItems {
        self.application.custom_items()
    }

    /// Returns the controller's view directory name.
    #[must_use]
    pub fn controller_name(&self) -> &str {
        &self.controller
    }

    /// Returns the action being invoked, as requested.
    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action
    }

    /// Returns the name the invoked action was registered under.
    ///
    /// `None` until an action has resolved.
    #[must_use]
    pub fn registered_action(&self) -> Option<&str> {
        self.registered_action.as_deref()
    }

    pub(crate) fn set_action(&mut self, action: &str, registered: &str) {
        action.clone_into(&mut self.action);
        self.registered_action = Some(registered.to_string());
    }

    /// Returns the view items collected so far.
    #[must_use]
    pub const fn view_items(&self) -> &ViewItems {
        &self.view_items
    }

    /// Returns the view items for modification.
    pub fn view_items_mut(&mut self) -> &mut ViewItems {
        &mut self.view_items
    }

    /// Sets a view item.
    pub fn set_view_item(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.view_items.set(name, value);
    }

    /// Returns the failure being handled, inside an error controller.
    #[must_use]
    pub const fn error(&self) -> Option<&'a DispatchError> {
        self.error
    }
}
