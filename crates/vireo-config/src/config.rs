//! The root configuration type and its builder.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use vireo_telemetry::LogFormat;

use crate::{ApplicationSection, ConfigError, LoggingSection, MetricsSection, ServerSection};

/// Complete Vireo configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to layer files and environment
/// variables on top of the defaults.
///
/// # Example
///
/// ```
/// use vireo_config::VireoConfig;
///
/// let config = VireoConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(!config.application.debug);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct VireoConfig {
    /// Site layout and debug mode.
    #[serde(default)]
    pub application: ApplicationSection,

    /// HTTP hosting.
    #[serde(default)]
    pub server: ServerSection,

    /// Structured logging.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Prometheus metrics.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl VireoConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> VireoConfigBuilder {
        VireoConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if an address does not parse,
    /// the log level or session cookie name is empty, or `max_connections`
    /// or `max_body_bytes` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_addr("server.http_addr", &self.server.http_addr)?;

        if self.metrics.enabled {
            validate_addr("metrics.addr", &self.metrics.addr)?;
        }

        if self.server.max_connections == Some(0) {
            return Err(ConfigError::invalid_value(
                "server.max_connections",
                "must be greater than zero",
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.server.session_cookie.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "server.session_cookie",
                "cookie name cannot be empty",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "level cannot be empty",
            ));
        }

        Ok(())
    }

    /// Development preset: debug pages, pretty debug logs, localhost bind.
    #[must_use]
    pub fn development() -> Self {
        Self {
            application: ApplicationSection {
                debug: true,
                ..ApplicationSection::default()
            },
            server: ServerSection {
                http_addr: "127.0.0.1:8080".to_string(),
                shutdown_timeout_secs: 5,
                ..ServerSection::default()
            },
            logging: LoggingSection {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..LoggingSection::default()
            },
            metrics: MetricsSection::default(),
        }
    }

    /// Production preset: JSON logs and metrics enabled.
    #[must_use]
    pub fn production() -> Self {
        Self {
            application: ApplicationSection::default(),
            server: ServerSection::default(),
            logging: LoggingSection::default(),
            metrics: MetricsSection {
                enabled: true,
                ..MetricsSection::default()
            },
        }
    }
}

fn validate_addr(field: &str, addr: &str) -> Result<(), ConfigError> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| ConfigError::invalid_value(field, format!("{addr}: {e}")))
}

/// Builder for [`VireoConfig`].
#[derive(Debug, Default)]
pub struct VireoConfigBuilder {
    config: VireoConfig,
}

impl VireoConfigBuilder {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application section.
    #[must_use]
    pub fn application(mut self, application: ApplicationSection) -> Self {
        self.config.application = application;
        self
    }

    /// Set the server section.
    #[must_use]
    pub fn server(mut self, server: ServerSection) -> Self {
        self.config.server = server;
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingSection) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsSection) -> Self {
        self.config.metrics = metrics;
        self
    }

    /// Build without validation.
    #[must_use]
    pub fn build(self) -> VireoConfig {
        self.config
    }

    /// Build and validate.
    ///
    /// # Errors
    ///
    /// See [`VireoConfig::validate`].
    pub fn build_validated(self) -> Result<VireoConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(VireoConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = VireoConfig::development();
        assert!(dev.application.debug);
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert!(dev.validate().is_ok());

        let prod = VireoConfig::production();
        assert!(!prod.application.debug);
        assert!(prod.metrics.enabled);
        assert!(prod.validate().is_ok());
    }

    #[test]
    fn test_invalid_http_addr() {
        let config = VireoConfig::builder()
            .server(ServerSection {
                http_addr: "localhost".to_string(),
                ..ServerSection::default()
            })
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_metrics_addr_only_checked_when_enabled() {
        let mut config = VireoConfig::default();
        config.metrics.addr = "bogus".to_string();
        assert!(config.validate().is_ok());

        config.metrics.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_connections() {
        let result = VireoConfig::builder()
            .server(ServerSection {
                max_connections: Some(0),
                ..ServerSection::default()
            })
            .build_validated();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_max_body_bytes() {
        let err = VireoConfig::builder()
            .server(ServerSection {
                max_body_bytes: 0,
                ..ServerSection::default()
            })
            .build_validated()
            .unwrap_err();
        assert!(err.to_string().contains("server.max_body_bytes"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<VireoConfig, _> = toml::from_str("[database]\nurl = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: VireoConfig = toml::from_str("[application]\ndebug = true").unwrap();
        assert!(config.application.debug);
        assert_eq!(config.server, ServerSection::default());
    }
}
