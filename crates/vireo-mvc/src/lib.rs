//! # Vireo MVC
//!
//! Controllers, action dispatch and the application run-loop.
//!
//! A request flows through:
//!
//! 1. [`Plugin::on_pre_request`] hooks, any of which may stop processing;
//! 2. the route table, first match wins;
//! 3. the matched [`Controller`], created fresh for the request, which
//!    resolves the action, converts path segments into typed arguments
//!    ([`ActionParam`]) and runs the pre-action hook, the action and the
//!    post-action hook;
//! 4. the error controller, for any error status;
//! 5. [`Plugin::on_post_request`] hooks.
//!
//! Actions return strings, [`ActionResult`]s, [`View`]s or nothing, and may
//! short-circuit with [`ActionError::Interrupt`] from anywhere.

#![doc(html_root_url = "https://docs.rs/vireo-mvc/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod application;
mod context;
mod controller;
mod error;
mod output;
mod param;
mod plugin;
mod template;
mod view;

pub use action::{action_method_name, Action, ActionTable, BoundAction};
pub use application::{Application, ApplicationBuilder};
pub use context::ActionContext;
pub use controller::{
    controller_name, handle_result, process_request, try_invoke_action, Controller,
    ControllerHandle, DEFAULT_ACTION, INDEX_ACTION,
};
pub use error::{ConfigurationError, DispatchError, ViewError};
pub use output::{ActionOutput, IntoActionOutcome};
pub use param::{ActionParam, Segment};
pub use plugin::Plugin;
pub use template::{TemplateRenderer, DEFAULT_TEMPLATE_EXTENSION};
pub use view::{View, ViewItems, ViewRenderer};

pub use vireo_core::{interrupt, ActionError, ActionOutcome, ActionResult};
