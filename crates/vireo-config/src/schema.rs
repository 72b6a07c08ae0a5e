//! Configuration schema types.
//!
//! Each section maps to a table in the configuration file. Unknown fields
//! are rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vireo_telemetry::{LogConfig, LogFormat, MetricsConfig};

/// Directory name used for views when no view path is configured.
pub const DEFAULT_VIEW_DIR: &str = "Views";

/// Default request body limit: 1 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application section: where the site lives and how errors are shown.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use vireo_config::ApplicationSection;
///
/// let section = ApplicationSection {
///     document_root: "/srv/site".into(),
///     view_path: Some("templates".into()),
///     debug: false,
/// };
/// assert_eq!(section.resolved_view_path(), Path::new("/srv/site/templates"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApplicationSection {
    /// Document root of the site.
    #[serde(default = "default_document_root")]
    pub document_root: PathBuf,

    /// View directory; relative paths are taken from the document root.
    #[serde(default)]
    pub view_path: Option<PathBuf>,

    /// Debug mode: unhandled failures are rendered into the response.
    #[serde(default)]
    pub debug: bool,
}

impl Default for ApplicationSection {
    fn default() -> Self {
        Self {
            document_root: default_document_root(),
            view_path: None,
            debug: false,
        }
    }
}

impl ApplicationSection {
    /// Returns the view directory, resolved against the document root.
    #[must_use]
    pub fn resolved_view_path(&self) -> PathBuf {
        match &self.view_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.document_root.join(path),
            None => self.document_root.join(DEFAULT_VIEW_DIR),
        }
    }

    /// Returns the document root.
    #[must_use]
    pub fn document_root(&self) -> &Path {
        &self.document_root
    }
}

fn default_document_root() -> PathBuf {
    PathBuf::from(".")
}

/// Server section: HTTP hosting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// HTTP bind address (e.g. `"0.0.0.0:8080"`).
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Keep-alive timeout in seconds. `None` disables keep-alive.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: Option<u64>,

    /// Maximum concurrent connections. `None` means unlimited.
    #[serde(default)]
    pub max_connections: Option<usize>,

    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Name of the session cookie.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            keep_alive_secs: default_keep_alive(),
            max_connections: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            session_cookie: default_session_cookie(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

#[allow(clippy::unnecessary_wraps)]
fn default_keep_alive() -> Option<u64> {
    Some(75)
}

const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_session_cookie() -> String {
    "VIREOSESSID".to_string()
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. `"info"`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line number.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            include_location: false,
        }
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            enabled: section.enabled,
            level: section.level.clone(),
            format: section.format,
            span_events: section.format == LogFormat::Pretty,
            include_location: section.include_location,
            include_target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Scrape endpoint address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

impl From<&MetricsSection> for MetricsConfig {
    fn from(section: &MetricsSection) -> Self {
        Self {
            enabled: section.enabled,
            addr: section.addr.clone(),
            ..Self::default()
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_defaults() {
        let section = ApplicationSection::default();
        assert_eq!(section.document_root(), Path::new("."));
        assert!(!section.debug);
        assert_eq!(section.resolved_view_path(), Path::new("./Views"));
    }

    #[test]
    fn test_absolute_view_path_is_kept() {
        let section = ApplicationSection {
            document_root: "/srv/site".into(),
            view_path: Some("/opt/views".into()),
            debug: true,
        };
        assert_eq!(section.resolved_view_path(), Path::new("/opt/views"));
    }

    #[test]
    fn test_server_defaults() {
        let section = ServerSection::default();
        assert_eq!(section.http_addr, "0.0.0.0:8080");
        assert_eq!(section.shutdown_timeout_secs, 30);
        assert_eq!(section.keep_alive_secs, Some(75));
        assert_eq!(section.max_connections, None);
        assert_eq!(section.max_body_bytes, 1024 * 1024);
        assert_eq!(section.session_cookie, "VIREOSESSID");

        let section: ServerSection = toml::from_str("max_body_bytes = 4096").unwrap();
        assert_eq!(section.max_body_bytes, 4096);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<ServerSection, _> = toml::from_str("http_port = 80");
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_bridge() {
        let section = LoggingSection {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
        };
        let config = LogConfig::from(&section);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.span_events);
        assert!(config.include_location);
    }

    #[test]
    fn test_metrics_bridge() {
        let section = MetricsSection {
            enabled: true,
            addr: "127.0.0.1:9100".to_string(),
        };
        let config = MetricsConfig::from(&section);
        assert!(config.enabled);
        assert_eq!(config.addr, "127.0.0.1:9100");
        assert!(!config.duration_buckets.is_empty());
    }
}
