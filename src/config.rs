//! Gateway configuration.
//!
//! Values come from environment variables and can be overridden by the CLI.
//! Only `CODEBEAMER_URL` is required.

use std::env;

use thiserror::Error;
use url::Url;

use crate::executor::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::gateway::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Environment variable holding the remote REST API base URL.
pub const ENV_BASE_URL: &str = "CODEBEAMER_URL";
/// Environment variable overriding the connect timeout (seconds).
pub const ENV_CONNECT_TIMEOUT: &str = "CBQL_GATEWAY_CONNECT_TIMEOUT_SECS";
/// Environment variable overriding the read timeout (seconds).
pub const ENV_READ_TIMEOUT: &str = "CBQL_GATEWAY_READ_TIMEOUT_SECS";
/// Environment variable overriding the default page size.
pub const ENV_PAGE_SIZE: &str = "CBQL_GATEWAY_PAGE_SIZE";
/// Environment variable overriding the page ceiling.
pub const ENV_MAX_PAGES: &str = "CBQL_GATEWAY_MAX_PAGES";

/// Largest accepted timeout (1 hour).
const MAX_TIMEOUT_SECS: u64 = 3600;
/// Largest accepted default page size.
const MAX_DEFAULT_PAGE_SIZE: u32 = 5000;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("missing required setting `{name}`\n  Suggestion: set the {name} environment variable or pass the matching flag")]
    Missing {
        /// Setting name.
        name: &'static str,
    },

    /// A setting has an unusable value.
    #[error("invalid value for `{name}`: {value} (expected {expected})")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// What would have been accepted.
        expected: &'static str,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: impl ToString, expected: &'static str) -> Self {
        Self::Invalid {
            name,
            value: value.to_string(),
            expected,
        }
    }
}

/// Runtime settings for the gateway and executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the remote REST API, e.g. `https://cb.example.com/cb/api`.
    pub base_url: String,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,
    /// Page size used when a query does not specify one.
    pub default_page_size: u32,
    /// Ceiling on pages fetched by one query run.
    pub max_pages: u32,
}

impl GatewayConfig {
    /// Creates a configuration with default tuning for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `CODEBEAMER_URL` is missing or any value
    /// fails to parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing { name: ENV_BASE_URL })?;

        let mut config = Self::new(base_url);
        if let Some(value) = parse_var(&lookup, ENV_CONNECT_TIMEOUT)? {
            config.connect_timeout_secs = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_READ_TIMEOUT)? {
            config.read_timeout_secs = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_PAGE_SIZE)? {
            config.default_page_size = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_MAX_PAGES)? {
            config.max_pages = value;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url);
        if !parsed
            .as_ref()
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        {
            return Err(ConfigError::invalid(
                ENV_BASE_URL,
                &self.base_url,
                "an absolute http:// or https:// URL",
            ));
        }
        validate_timeout(ENV_CONNECT_TIMEOUT, self.connect_timeout_secs)?;
        validate_timeout(ENV_READ_TIMEOUT, self.read_timeout_secs)?;
        if !(1..=MAX_DEFAULT_PAGE_SIZE).contains(&self.default_page_size) {
            return Err(ConfigError::invalid(
                ENV_PAGE_SIZE,
                self.default_page_size,
                "1..=5000",
            ));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::invalid(ENV_MAX_PAGES, 0, "at least 1"));
        }
        Ok(())
    }
}

fn validate_timeout(name: &'static str, value: u64) -> Result<(), ConfigError> {
    if (1..=MAX_TIMEOUT_SECS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, value, "1..=3600 seconds"))
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::invalid(name, raw, "a non-negative integer")),
    }
}
