use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Groupware service connection
    pub service: ServiceConfig,

    /// Transport retry policy
    #[serde(default)]
    pub retry: RetrySettings,

    /// Default folders for saved responses
    #[serde(default)]
    pub responses: ResponsesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the groupware item service
    pub endpoint_url: String,

    /// Bearer token (optional, can be set via `RSVP_ACCESS_TOKEN`)
    pub access_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Allow invalid/self-signed certificates (DEVELOPMENT ONLY)
    ///
    /// Only takes effect in debug builds.
    #[serde(default)]
    pub allow_invalid_certs: bool,
}

fn default_request_timeout() -> u64 {
    30
}

/// Retry policy applied by the HTTP transport, never by the response core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    5000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Well-known folder names (e.g. "drafts", "sentitems") used when a caller
/// asks for the configured destination instead of naming one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsesConfig {
    pub default_save_folder: Option<String>,
    pub default_copy_folder: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                endpoint_url: "https://outlook.office365.com/ews".to_string(),
                access_token: std::env::var("RSVP_ACCESS_TOKEN").ok(),
                request_timeout_secs: default_request_timeout(),
                allow_invalid_certs: false,
            },
            retry: RetrySettings::default(),
            responses: ResponsesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load_validated_from(&Self::config_path()?)
    }

    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult)> {
        let config = Self::load_from(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.service.endpoint_url,
            "service.endpoint_url",
            &mut result,
        );

        match self.service.access_token.as_deref() {
            None => result.add_warning(
                "service.access_token",
                "No access token configured - requests will be unauthenticated",
            ),
            Some(token) if token.trim().is_empty() => {
                result.add_error("service.access_token", "Access token is empty")
            }
            Some(_) => {}
        }

        if self.service.request_timeout_secs == 0 {
            result.add_error(
                "service.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.service.allow_invalid_certs {
            result.add_warning(
                "service.allow_invalid_certs",
                "Certificate validation disabled (debug builds only)",
            );
        }

        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            result.add_error(
                "retry.initial_delay_ms",
                "Initial delay cannot exceed retry.max_delay_ms",
            );
        }
        if self.retry.max_retries > 10 {
            result.add_warning("retry.max_retries", "More than 10 retries configured");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                } else if url.scheme() == "http" {
                    result.add_warning(field_name, "Credentials will be sent unencrypted");
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("rsvp");

        Ok(config_dir.join("config.toml"))
    }
}
