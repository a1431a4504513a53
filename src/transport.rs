//! HTTP transport for the CASDM REST service.
//!
//! One call, one round trip: [`Transport::execute`] attaches the fixed
//! headers every authenticated request needs, sends the request and buffers
//! the whole response body. Non-success status codes become
//! [`CasdmError::HttpStatus`] here, before anything tries to decode them.
//!
//! # Security
//!
//! The access key is never logged, and it is redacted from error bodies.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};

use crate::error::CasdmError;

/// Header carrying the session's access key.
pub const HEADER_ACCESS_KEY: &str = "X-AccessKey";

/// Header listing the attributes the service should echo back.
pub const HEADER_OBJ_ATTRS: &str = "X-Obj-Attrs";

/// Attributes requested on every incident response.
pub const OBJ_ATTRS: &str = "ref_num, status, summary";

/// The Accept header value; the service is asked for XML only.
pub const XML_ACCEPT: &str = "application/xml";

/// Content type of every request body.
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=UTF-8";

/// Maximum length for HTTP error response bodies kept in errors.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Executes single requests against the service.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    timeout: Option<Duration>,
}

impl Transport {
    /// Builds a transport with its own HTTP client.
    ///
    /// `timeout` bounds every request made through this transport; `None`
    /// leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns `CasdmError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(timeout: Option<Duration>) -> Result<Self, CasdmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(CasdmError::HttpClient)?;

        Ok(Self { http, timeout })
    }

    /// Wraps a caller-built client, e.g. one with custom TLS or proxy settings.
    ///
    /// `timeout` is the timeout `http` was built with; it is only reported in
    /// logs.
    pub fn from_client(http: Client, timeout: Option<Duration>) -> Self {
        Self { http, timeout }
    }

    /// The HTTP client requests are sent with.
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Sends one authenticated request and returns the buffered response body.
    ///
    /// # Errors
    ///
    /// - `CasdmError::Http` if the request cannot be sent or the body cannot be read
    /// - `CasdmError::Timeout` if the configured timeout elapsed
    /// - `CasdmError::HttpStatus` for any non-2xx response
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        access_key: &str,
        body: String,
    ) -> Result<String, CasdmError> {
        self.execute_with_query(method, url, &[], access_key, body)
            .await
    }

    /// Like [`execute`](Self::execute), with query parameters appended to `url`.
    pub async fn execute_with_query(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        access_key: &str,
        body: String,
    ) -> Result<String, CasdmError> {
        let operation = format!("{} {}", method, path_of(url));

        tracing::debug!(operation = %operation, "Sending CASDM request");

        let mut req = self
            .http
            .request(method, url)
            .header(HEADER_ACCESS_KEY, access_key)
            .header(reqwest::header::ACCEPT, XML_ACCEPT)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .header(HEADER_OBJ_ATTRS, OBJ_ATTRS);

        if !query.is_empty() {
            req = req.query(query);
        }

        let response = req
            .body(body)
            .send()
            .await
            .map_err(|e| self.send_error(e, &operation))?;

        read_body(response, access_key).await
    }

    /// Classifies a send failure.
    pub(crate) fn send_error(&self, error: reqwest::Error, operation: &str) -> CasdmError {
        if error.is_timeout() {
            tracing::warn!(operation = %operation, timeout = ?self.timeout, "CASDM request timed out");
            return CasdmError::Timeout {
                operation: operation.to_string(),
            };
        }
        CasdmError::Http(error)
    }
}

/// Buffers a response body, turning non-success statuses into errors.
///
/// `secret` is redacted from any body kept in an error.
pub(crate) async fn read_body(response: Response, secret: &str) -> Result<String, CasdmError> {
    let status = response.status();

    if !status.is_success() {
        return Err(http_status_error(status, response, secret).await);
    }

    let body = response.text().await.map_err(CasdmError::Http)?;

    tracing::debug!(status = %status, bytes = body.len(), "CASDM response received");
    tracing::trace!(body = %CasdmError::sanitize_message(&body, secret), "CASDM response body");

    Ok(body)
}

async fn http_status_error(status: StatusCode, response: Response, secret: &str) -> CasdmError {
    let body = response.text().await.unwrap_or_default();
    let body = CasdmError::sanitize_message(&body, secret);
    let body = truncate_body(body);

    tracing::debug!(status = %status, "CASDM returned non-success status");

    CasdmError::HttpStatus { status, body }
}

fn truncate_body(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body;
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

/// Strips scheme and host so logs show only the resource path.
fn path_of(url: &str) -> &str {
    url.find("://")
        .and_then(|scheme_end| {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map(|slash| &rest[slash..])
        })
        .unwrap_or(url)
}
