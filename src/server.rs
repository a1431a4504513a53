//! MCP server implementation for CASDM.
//!
//! This module defines the `CasdmServer` struct that implements the MCP
//! `ServerHandler` trait, exposing the incident operations as tools.
//!
//! The server is a long-lived caller of [`Session`]: when the service
//! rejects the access key it authenticates once more and repeats the call.

use std::future::Future;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::sync::RwLock;

use crate::codec::DecodedCollection;
use crate::config::Config;
use crate::error::CasdmError;
use crate::models::Incident;
use crate::session::Session;
use crate::tools::{
    CloseIncidentInput, CreateIncidentInput, GetIncidentInput, ListIncidentsInput,
    UpdateIncidentInput,
};

/// Longest summary the service stores.
const MAX_SUMMARY_LENGTH: usize = 240;

/// The CASDM MCP server.
#[derive(Clone)]
pub struct CasdmServer {
    /// Current session; replaced when the access key is rejected.
    session: Arc<RwLock<Session>>,
    /// Connection settings used to authenticate again.
    config: Arc<Config>,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CasdmServer {
    /// Creates a new server around an authenticated session.
    pub fn new(session: Session, config: Config) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// A simple ping tool to verify the server is running.
    #[tool(description = "Test connectivity to the CASDM MCP server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    /// Open a new incident.
    #[tool(description = "Open a new incident in CA Service Desk Manager for a customer. Customer login and summary are required. Returns the created incident with its ID and reference number.")]
    async fn create_incident(
        &self,
        Parameters(input): Parameters<CreateIncidentInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(customer = %input.customer, "create_incident tool called");

        if input.customer.is_empty() {
            return Err("Customer is required and cannot be empty.".to_string());
        }
        validate_summary(&input.summary)?;

        let customer = input.customer;
        let summary = input.summary;
        let description = input.description.unwrap_or_default();

        let incident = self
            .with_session("create_incident", |session| {
                let (customer, summary, description) =
                    (customer.clone(), summary.clone(), description.clone());
                async move { session.create(&customer, &summary, &description).await }
            })
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to create incident");
                format!("Failed to create incident: {}", sanitized)
            })?;

        Ok(format!(
            "Successfully created incident.\n\n{}",
            format_incident_details(&incident)
        ))
    }

    /// Get a single incident.
    #[tool(description = "Get an incident by its numeric ID. Returns status, status code, summary and reference number.")]
    async fn get_incident(
        &self,
        Parameters(input): Parameters<GetIncidentInput>,
    ) -> Result<String, String> {
        tracing::debug!(incident_id = input.incident_id, "get_incident tool called");
        let id = validate_id(input.incident_id)?;

        let incident = self
            .with_session("get_incident", |session| async move { session.read(id).await })
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, incident_id = id, "Failed to get incident");
                format!("Failed to get incident {}: {}", id, sanitized)
            })?;

        Ok(format_incident_details(&incident))
    }

    /// Update status, status code or summary of an incident.
    #[tool(description = "Update an incident's status, status code, or summary. Incident ID is required and at least one field must be provided.")]
    async fn update_incident(
        &self,
        Parameters(input): Parameters<UpdateIncidentInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(incident_id = input.incident_id, "update_incident tool called");
        let id = validate_id(input.incident_id)?;

        if !input.has_updates() {
            return Err(
                "At least one field must be provided for update (status, code, or summary)."
                    .to_string(),
            );
        }
        if let Some(ref summary) = input.summary {
            validate_summary(summary)?;
        }

        let change = input.to_incident();
        let incident = self
            .with_session("update_incident", |session| {
                let change = change.clone();
                async move { session.update(id, &change).await }
            })
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, incident_id = id, "Failed to update incident");
                format!("Failed to update incident {}: {}", id, sanitized)
            })?;

        Ok(format!(
            "Successfully updated incident.\n\n{}",
            format_incident_details(&incident)
        ))
    }

    /// Close an incident.
    #[tool(description = "Close an incident. The service has no delete, so this sets the closed status. Incident ID is required.")]
    async fn close_incident(
        &self,
        Parameters(input): Parameters<CloseIncidentInput>,
    ) -> Result<String, String> {
        tracing::debug!(incident_id = input.incident_id, "close_incident tool called");
        let id = validate_id(input.incident_id)?;

        let incident = self
            .with_session("close_incident", |session| async move { session.close(id).await })
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, incident_id = id, "Failed to close incident");
                format!("Failed to close incident {}: {}", id, sanitized)
            })?;

        Ok(format!(
            "Successfully closed incident.\n\n{}",
            format_incident_details(&incident)
        ))
    }

    /// List the most recent incidents.
    #[tool(description = "List the most recent incidents, newest first. Optional limit (default 20, max 100).")]
    async fn list_incidents(
        &self,
        Parameters(input): Parameters<ListIncidentsInput>,
    ) -> Result<String, String> {
        let limit = input.effective_limit();
        tracing::debug!(limit = limit, "list_incidents tool called");

        let decoded = self
            .with_session("list_incidents", |session| async move { session.list(limit).await })
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to list incidents");
                format!("Failed to list incidents: {}", sanitized)
            })?;

        Ok(format_incident_list(&decoded))
    }

    /// Runs `f` with the current session, authenticating again once if the
    /// service rejects the access key.
    async fn with_session<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, CasdmError>
    where
        F: Fn(Session) -> Fut,
        Fut: Future<Output = Result<T, CasdmError>>,
    {
        let session = self.session.read().await.clone();

        match f(session).await {
            Err(e) if e.is_unauthorized() => {
                tracing::info!(operation = operation, "Access key rejected, authenticating again");
                let session = self.reauthenticate().await?;
                f(session).await
            }
            other => other,
        }
    }

    /// Obtains a new access key and makes it the current session.
    async fn reauthenticate(&self) -> Result<Session, CasdmError> {
        let transport = self.session.read().await.transport().clone();
        let session = Session::authenticate_with(
            transport,
            &self.config.base_url,
            &self.config.credentials(),
        )
        .await?;

        *self.session.write().await = session.clone();
        Ok(session)
    }

    /// Sanitizes an error message to remove the password.
    ///
    /// Transport errors already have the access key redacted.
    fn sanitize_error(&self, error: &CasdmError) -> String {
        error.sanitized_display(self.config.password_for_sanitization())
    }
}

#[tool_handler]
impl ServerHandler for CasdmServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "This server provides access to CA Service Desk Manager incidents. \
                 Use list_incidents to see recent incidents and get_incident for one incident. \
                 Open incidents with create_incident, change status or summary with \
                 update_incident, and close them with close_incident. \
                 Start with 'ping' to verify connectivity."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Validation and response formatting helpers
// ============================================================================

fn validate_id(id: i64) -> Result<i64, String> {
    if id <= 0 {
        return Err(format!("Incident ID must be a positive number (got {}).", id));
    }
    Ok(id)
}

fn validate_summary(summary: &str) -> Result<(), String> {
    if summary.is_empty() {
        return Err("Summary is required and cannot be empty.".to_string());
    }
    let length = summary.chars().count();
    if length > MAX_SUMMARY_LENGTH {
        return Err(format!(
            "Summary exceeds maximum length of {} characters (got {} characters).",
            MAX_SUMMARY_LENGTH, length
        ));
    }
    Ok(())
}

/// Formats a single incident as human-readable text.
fn format_incident_details(incident: &Incident) -> String {
    let mut output = format!(
        "Incident {} (ID {}): {}\n",
        incident.number,
        incident.id,
        incident.display_summary()
    );
    output.push_str(&format!("Status: {}", incident.display_status()));
    if !incident.code.is_empty() {
        output.push_str(&format!(" ({})", incident.code));
    }
    output.push('\n');
    output
}

/// Formats a decoded collection, one line per record.
fn format_incident_list(decoded: &DecodedCollection) -> String {
    if decoded.is_empty() {
        return "No incidents found.".to_string();
    }

    let mut output = match decoded.total_count {
        Some(total) => format!("Showing {} of {} incident(s):\n\n", decoded.len(), total),
        None => format!("Found {} incident(s):\n\n", decoded.len()),
    };

    for (position, entry) in decoded.entries.iter().enumerate() {
        match entry {
            Ok(incident) => {
                output.push_str(&format!(
                    "{} (ID {}) - {}\n   Status: {}\n",
                    incident.number,
                    incident.id,
                    incident.display_summary(),
                    incident.display_status()
                ));
            }
            Err(e) => {
                output.push_str(&format!(
                    "[record {} could not be read: {}]\n",
                    position + 1,
                    e
                ));
            }
        }
    }

    if decoded.failures() > 0 {
        output.push_str(&format!(
            "\n{} record(s) were skipped because the service returned invalid data.\n",
            decoded.failures()
        ));
    }

    output
}
