//! # Vireo
//!
//! **A small MVC web framework**
//!
//! - Ordered, first-match route table mapping URL prefixes to controllers
//! - Controllers with registered actions, typed path parameters and
//!   pre/post-action hooks
//! - A closed set of action results (content, redirects, errors, JSON)
//! - Views rendered by pluggable renderers, with a built-in `.tpl` engine
//! - Plugins around every request, and an optional error controller
//! - Layered configuration, structured logging and Prometheus metrics
//! - A Hyper/Tokio server with cookie sessions and graceful shutdown
//!
//! ## Quick Start
//!
//! ```rust
//! use vireo::prelude::*;
//!
//! #[derive(Default)]
//! struct HomeController;
//!
//! impl HomeController {
//!     fn index(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
//!         "Hello World!"
//!     }
//! }
//!
//! impl Controller for HomeController {
//!     fn register(actions: &mut ActionTable<Self>) {
//!         actions.add("index", Self::index);
//!     }
//! }
//!
//! let application = Application::builder()
//!     .route::<HomeController>("")
//!     .build()
//!     .unwrap();
//!
//! let response = application.handle(Request::get("http://localhost/").unwrap());
//! assert_eq!(response.content(), "Hello World!");
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → pre-request plugins → route match → controller
//!            (stop: skip to output)               ↓
//!                                pre-action → action → post-action → result
//!                                                                       ↓
//! Response ← post-request plugins ← error controller (status ≥ 400) ←──┘
//! ```
//!
//! ## Serving
//!
//! ```rust,no_run
//! use vireo::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("vireo.toml")?
//!         .with_dotenv()?
//!         .with_env_prefix("VIREO")
//!         .load()?;
//!     vireo::telemetry::init_telemetry(
//!         &LogConfig::from(&config.logging),
//!         &MetricsConfig::from(&config.metrics),
//!     )?;
//!
//!     let application = Application::builder()
//!         .with_config(&config.application)
//!         .build()?;
//!
//!     Server::builder()
//!         .config(ServerConfig::from(&config.server))
//!         .application(application)
//!         .build()?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/vireo/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use vireo_core as core;

// Re-export routing
pub use vireo_router as router;

// Re-export the MVC layer
pub use vireo_mvc as mvc;

// Re-export configuration
pub use vireo_config as config;

// Re-export logging and metrics
pub use vireo_telemetry as telemetry;

// Re-export the server
pub use vireo_server as server;

/// Prelude module for convenient imports.
///
/// ```rust
/// use vireo::prelude::*;
/// ```
pub mod prelude {
    pub use vireo_core::{
        ActionResult, CustomItems, MemorySessionStore, Method, Request, Response,
        ResponseCookie, SessionStore, StatusCode,
    };

    pub use vireo_mvc::{
        interrupt, ActionContext, ActionError, ActionOutcome, ActionOutput, ActionTable,
        Application, ApplicationBuilder, ConfigurationError, Controller, DispatchError, Plugin,
        Segment, TemplateRenderer, View, ViewError, ViewItems, ViewRenderer,
    };

    pub use vireo_config::{ConfigLoader, LogConfig, MetricsConfig, VireoConfig};

    pub use vireo_server::{Server, ServerConfig, ShutdownSignal};
}
