//! # Vireo Server
//!
//! Hosts a Vireo [`Application`](vireo_mvc::Application) on Hyper and
//! Tokio:
//!
//! - HTTP/1.1 connections with keep-alive
//! - wire request to [`Request`](vireo_core::Request) conversion, with a
//!   400 for anything that cannot be converted
//! - a request body limit, answered with 413
//! - cookie-keyed sessions, stored once the application writes to them
//! - graceful shutdown on SIGTERM/SIGINT or an explicit [`ShutdownSignal`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use vireo_config::ConfigLoader;
//! use vireo_mvc::Application;
//! use vireo_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_env_prefix("VIREO").load()?;
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

#![doc(html_root_url = "https://docs.rs/vireo-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod convert;
mod error;
mod server;
mod session;
pub mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_KEEP_ALIVE_SECS,
    DEFAULT_MAX_BODY_BYTES, DEFAULT_SESSION_COOKIE, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use convert::{
    plain_response, session_id, to_http_response, to_request, HttpResponse, ResponseBody,
};
pub use error::ServerError;
pub use server::{Server, ServerBuilder};
pub use session::{ResolvedSession, SessionRegistry};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
