//! Server configuration.
//!
//! # Example
//!
//! ```rust
//! use vireo_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("127.0.0.1:3000")
//!     .shutdown_timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "127.0.0.1:3000");
//! assert_eq!(config.session_cookie(), "VIREOSESSID");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use vireo_config::ServerSection;

pub use vireo_config::DEFAULT_MAX_BODY_BYTES;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default keep-alive timeout in seconds.
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 75;

/// Default name of the session cookie.
pub const DEFAULT_SESSION_COOKIE: &str = "VIREOSESSID";

/// Server configuration. Build one with [`ServerConfig::builder`] or from
/// the `[server]` configuration section.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout: Duration,
    keep_alive_timeout: Option<Duration>,
    max_connections: Option<usize>,
    max_body_bytes: usize,
    session_cookie: String,
}

impl ServerConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// How long in-flight connections may take to drain on shutdown.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Idle timeout of keep-alive connections; `None` disables keep-alive.
    #[must_use]
    pub fn keep_alive_timeout(&self) -> Option<Duration> {
        self.keep_alive_timeout
    }

    /// Maximum concurrent connections, if limited.
    #[must_use]
    pub fn max_connections(&self) -> Option<usize> {
        self.max_connections
    }

    /// Largest request body accepted; larger bodies get a 413.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Name of the cookie carrying the session ID.
    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        Self::builder()
            .http_addr(section.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(section.shutdown_timeout_secs))
            .keep_alive_timeout(section.keep_alive_secs.map(Duration::from_secs))
            .max_connections(section.max_connections)
            .max_body_bytes(section.max_body_bytes)
            .session_cookie(section.session_cookie.clone())
            .build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    keep_alive_timeout: Option<Duration>,
    max_connections: Option<usize>,
    max_body_bytes: usize,
    session_cookie: String,
}

impl ServerConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            keep_alive_timeout: Some(Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS)),
            max_connections: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the keep-alive timeout.
    #[must_use]
    pub fn keep_alive_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.keep_alive_timeout = timeout;
        self
    }

    /// Limits concurrent connections.
    #[must_use]
    pub fn max_connections(mut self, max: Option<usize>) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the request body limit in bytes.
    #[must_use]
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Sets the session cookie name.
    #[must_use]
    pub fn session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            keep_alive_timeout: self.keep_alive_timeout,
            max_connections: self.max_connections,
            max_body_bytes: self.max_body_bytes,
            session_cookie: self.session_cookie,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
