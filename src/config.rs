//! Configuration management for the CASDM MCP server.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::CasdmError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to CA Service Desk Manager.
///
/// The password is stored but never logged or exposed in error messages.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the CASDM REST service (e.g., `https://sdm.example.com/caisd-rest`).
    pub base_url: String,

    /// Login name used for `/rest_access`.
    pub username: String,

    /// Password for `username`.
    /// This value must never be logged or included in error messages.
    password: String,

    /// Per-request timeout; `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Builds a configuration directly, validating the base URL.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CasdmError> {
        Ok(Config {
            base_url: Self::validate_base_url(base_url.into())?,
            username: username.into(),
            password: password.into(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `CASDM_BASE_URL`: Base URL of the CASDM REST service
    /// - `CASDM_USERNAME`: Login name
    /// - `CASDM_PASSWORD`: Password
    ///
    /// # Optional Environment Variables
    ///
    /// - `CASDM_TIMEOUT_SECS`: Request timeout in seconds (default 30, `0` disables)
    ///
    /// # Errors
    ///
    /// Returns `CasdmError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, CasdmError> {
        let base_url = Self::get_required_env("CASDM_BASE_URL")?;
        let username = Self::get_required_env("CASDM_USERNAME")?;
        let password = Self::get_required_env("CASDM_PASSWORD")?;

        let base_url = Self::validate_base_url(base_url)?;
        Self::validate_password(&password)?;

        let timeout = match env::var("CASDM_TIMEOUT_SECS") {
            Ok(raw) => Self::parse_timeout(&raw)?,
            Err(_) => Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        };

        Ok(Config {
            base_url,
            username: username.trim().to_string(),
            password,
            timeout,
        })
    }

    /// Returns the `user:password` pair sent as the Basic credential.
    pub fn credentials(&self) -> String {
        format!("{}:{}", self.username, self.password)
    }

    /// Returns the password for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing error messages, never for logging.
    pub fn password_for_sanitization(&self) -> &str {
        &self.password
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, CasdmError> {
        env::var(name)
            .map_err(|_| CasdmError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(CasdmError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, CasdmError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CasdmError::invalid_config(
                "CASDM_BASE_URL must start with http:// or https://",
            ));
        }

        Url::parse(&url)
            .map_err(|e| CasdmError::invalid_config(format!("CASDM_BASE_URL is invalid: {}", e)))?;

        Ok(url)
    }

    /// Validates the password is not a placeholder value.
    fn validate_password(password: &str) -> Result<(), CasdmError> {
        let lower = password.to_lowercase();
        let placeholder_patterns = ["your_password", "placeholder", "changeme", "xxx"];

        if placeholder_patterns.iter().any(|p| lower.contains(p)) {
            return Err(CasdmError::invalid_config(
                "CASDM_PASSWORD appears to be a placeholder value",
            ));
        }

        Ok(())
    }

    /// Parses `CASDM_TIMEOUT_SECS`; zero disables the timeout.
    fn parse_timeout(raw: &str) -> Result<Option<Duration>, CasdmError> {
        let secs: u64 = raw.trim().parse().map_err(|_| {
            CasdmError::invalid_config(format!(
                "CASDM_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                raw
            ))
        })?;

        Ok((secs > 0).then(|| Duration::from_secs(secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: Tests that modify environment variables should not run in parallel,
    // so from_env() is exercised through its helpers only.

    #[test]
    fn test_validate_base_url_removes_trailing_slash() {
        let result =
            Config::validate_base_url("https://sdm.example.com/caisd-rest/".to_string()).unwrap();
        assert_eq!(result, "https://sdm.example.com/caisd-rest");
    }

    #[test]
    fn test_validate_base_url_requires_scheme() {
        let result = Config::validate_base_url("sdm.example.com".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_base_url_rejects_garbage_host() {
        let result = Config::validate_base_url("http://exa mple.com".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_password_rejects_placeholder() {
        assert!(Config::validate_password("changeme").is_err());
        assert!(Config::validate_password("s3cure-Pass").is_ok());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(
            Config::parse_timeout("10").unwrap(),
            Some(Duration::from_secs(10))
        );
        assert_eq!(Config::parse_timeout("0").unwrap(), None);
        assert!(Config::parse_timeout("ten").is_err());
    }

    #[test]
    fn test_credentials_and_debug_redaction() {
        let config = Config::new("https://sdm.example.com/", "servicedesk", "hunter2").unwrap();
        assert_eq!(config.base_url, "https://sdm.example.com");
        assert_eq!(config.credentials(), "servicedesk:hunter2");

        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
