//! Error types for the CASDM client.
//!
//! This module defines `CasdmError`, the single error type returned by the
//! transport, the XML codec, the session operations and the MCP server.
//!
//! # Security
//!
//! Access keys and credentials must never end up in logs or tool responses.
//! Use `sanitize_message()` (or `sanitized_display()`) whenever an error or a
//! response body is about to leave the process.

use std::num::ParseIntError;

use thiserror::Error;

/// Unified error type for all CASDM operations.
#[derive(Error, Debug)]
pub enum CasdmError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request could not be built, sent, or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The request exceeded the transport's configured timeout.
    #[error("request timed out: {operation}")]
    Timeout {
        /// Method and path of the request that timed out.
        operation: String,
    },

    /// The service answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The (sanitized, truncated) response body.
        body: String,
    },

    /// The response was not well-formed XML or did not match the expected elements.
    #[error("XML decode error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// A request body could not be serialized.
    #[error("XML encode error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),

    /// A numeric wire field held something other than an integer.
    #[error("invalid {field} {value:?}: {source}")]
    Parse {
        /// Name of the wire field (e.g. `id`, `ref_num`).
        field: &'static str,
        /// The offending value as received.
        value: String,
        /// The underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The `/rest_access` round trip did not yield a usable access key.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Input validation failed before any request was made.
    #[error("validation error: {0}")]
    Validation(String),
}

impl CasdmError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        CasdmError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CasdmError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CasdmError::Validation(message.into())
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        CasdmError::Authentication(message.into())
    }

    /// Creates a parse error for a numeric wire field.
    pub fn parse(field: &'static str, value: impl Into<String>, source: ParseIntError) -> Self {
        CasdmError::Parse {
            field,
            value: value.into(),
            source,
        }
    }

    /// Returns true if the service rejected the access key.
    ///
    /// The service does not announce expiry, so a 401/403 on an authenticated
    /// request is the signal that the caller should authenticate again.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            CasdmError::HttpStatus { status, .. }
                if *status == reqwest::StatusCode::UNAUTHORIZED
                    || *status == reqwest::StatusCode::FORBIDDEN
        )
    }

    /// Sanitizes a message by replacing every occurrence of `secret` with `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, secret: &str) -> String {
        if secret.is_empty() {
            return message.to_string();
        }
        message.replace(secret, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, secret: &str) -> String {
        Self::sanitize_message(&self.to_string(), secret)
    }
}
