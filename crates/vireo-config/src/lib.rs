//! Typed configuration for Vireo applications.
//!
//! Configuration is layered (defaults or a preset, then a TOML or JSON
//! file, then `VIREO__SECTION__KEY` environment variables) and strict:
//! unknown fields are rejected.
//!
//! # Configuration File Format
//!
//! ```toml
//! [application]
//! document_root = "/srv/site"
//! view_path = "Views"
//! debug = false
//!
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! keep_alive_secs = 75
//! session_cookie = "VIREOSESSID"
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vireo_config::ConfigLoader;
//!
//! # fn main() -> Result<(), vireo_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("vireo.toml")?
//!     .with_env_prefix("VIREO")
//!     .load()?;
//! # let _ = config;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{VireoConfig, VireoConfigBuilder};
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    ApplicationSection, LoggingSection, MetricsSection, ServerSection, DEFAULT_MAX_BODY_BYTES, DEFAULT_VIEW_DIR,
};
pub use vireo_telemetry::{LogConfig, LogFormat, MetricsConfig};
