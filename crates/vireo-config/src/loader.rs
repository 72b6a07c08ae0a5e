//! Layered configuration loading.
//!
//! Layers are applied in order, later ones winning: a preset or the
//! defaults, then a file (TOML or JSON), then `PREFIX__SECTION__KEY`
//! environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use vireo_telemetry::LogFormat;

use crate::{ConfigError, VireoConfig};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "VIREO";

/// Configuration loader.
///
/// # Example
///
/// ```no_run
/// use vireo_config::ConfigLoader;
///
/// # fn main() -> Result<(), vireo_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("vireo.toml")?
///     .with_env_prefix("VIREO")
///     .load()?;
/// println!("document root: {}", config.application.document_root.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: VireoConfig,
    env_prefix: Option<String>,
    file_loaded: bool,
}

impl ConfigLoader {
    /// Create a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = VireoConfig::default();
        self
    }

    /// Start from [`VireoConfig::development`].
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = VireoConfig::development();
        self
    }

    /// Start from [`VireoConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = VireoConfig::production();
        self
    }

    /// Load a `.toml` or `.json` file.
    ///
    /// The file replaces the current configuration as a whole; sections it
    /// omits take their defaults, not the preset's values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, has an
    /// unsupported extension or does not parse.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.config = parse(&content, &format)?;
        self.file_loaded = true;
        Ok(self)
    }

    /// Load a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`with_file`](Self::with_file) when the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration text in the given format (`"toml"` or `"json"`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown format or invalid content.
    ///
    /// # Example
    ///
    /// ```
    /// use vireo_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[application]\ndebug = true", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    /// assert!(config.application.debug);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Enable environment overrides with `prefix` (uppercased).
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the working directory, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if the file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::Dotenv(e.to_string())),
        }
    }

    /// Returns true once a file has been loaded.
    #[must_use]
    pub const fn file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an override does not parse or the result
    /// fails [`VireoConfig::validate`].
    pub fn load(mut self) -> Result<VireoConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: Vec<(String, String)> = env::vars()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect();
            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the configuration without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> VireoConfig {
        self.config
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
        else {
            // Shares the prefix but not the separator, e.g. VIREOX.
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["APPLICATION", "DOCUMENT_ROOT"] => {
                config.application.document_root = PathBuf::from(value);
            }
            ["APPLICATION", "VIEW_PATH"] => {
                config.application.view_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            ["APPLICATION", "DEBUG"] => {
                config.application.debug = parse_bool(key, value)?;
            }
            ["SERVER", "HTTP_ADDR"] => {
                config.server.http_addr = value.to_string();
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "KEEP_ALIVE_SECS"] => {
                config.server.keep_alive_secs = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_int(key, value)?)
                };
            }
            ["SERVER", "MAX_CONNECTIONS"] => {
                config.server.max_connections = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_int(key, value)?)
                };
            }
            ["SERVER", "MAX_BODY_BYTES"] => {
                config.server.max_body_bytes = parse_int(key, value)?;
            }
            ["SERVER", "SESSION_COOKIE"] => {
                config.server.session_cookie = value.to_string();
            }
            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = parse_bool(key, value)?;
            }
            ["LOGGING", "LEVEL"] => {
                config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                config.logging.include_location = parse_bool(key, value)?;
            }
            ["METRICS", "ENABLED"] => {
                config.metrics.enabled = parse_bool(key, value)?;
            }
            ["METRICS", "ADDR"] => {
                config.metrics.addr = value.to_string();
            }
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<VireoConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env_parse_error(key, "expected boolean")),
    }
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}
