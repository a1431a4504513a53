//! Tool input parameter structs for MCP tools.
//!
//! This module defines the input types for each MCP tool, with
//! JSON Schema derivation for MCP tool discovery.
//!
//! # Input Sanitization
//!
//! All input structs implement `sanitize()` which trims whitespace
//! from string fields. This should be called before processing input.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use crate::models::Incident;

/// Default number of incidents returned by list_incidents.
pub const DEFAULT_LIST_LIMIT: u32 = 20;

/// Largest page list_incidents will request.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Helper function to trim an optional string.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Input parameters for the create_incident tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateIncidentInput {
    /// Login name of the customer the incident is opened for.
    pub customer: String,

    /// One-line summary (required, max 240 characters).
    pub summary: String,

    /// Free-text description of the problem.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateIncidentInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            customer: self.customer.trim().to_string(),
            summary: self.summary.trim().to_string(),
            description: trim_option(&self.description),
        }
    }
}

/// Input parameters for the get_incident tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetIncidentInput {
    /// Numeric identifier of the incident (not the reference number).
    pub incident_id: i64,
}

/// Input parameters for the update_incident tool.
///
/// Incident ID is required. At least one other field must be provided.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateIncidentInput {
    /// Numeric identifier of the incident to update.
    pub incident_id: i64,

    /// New status display name (e.g., 'Aberto', 'Em andamento').
    #[serde(default)]
    pub status: Option<String>,

    /// New status code (e.g., 'OP', 'WIP').
    #[serde(default)]
    pub code: Option<String>,

    /// New summary (max 240 characters).
    #[serde(default)]
    pub summary: Option<String>,
}

impl UpdateIncidentInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            incident_id: self.incident_id,
            status: trim_option(&self.status),
            code: trim_option(&self.code),
            summary: trim_option(&self.summary),
        }
    }

    /// Returns true if at least one field would change.
    pub fn has_updates(&self) -> bool {
        self.status.is_some() || self.code.is_some() || self.summary.is_some()
    }

    /// Builds the partial incident sent to the service.
    pub fn to_incident(&self) -> Incident {
        Incident {
            status: self.status.clone().unwrap_or_default(),
            code: self.code.clone().unwrap_or_default(),
            summary: self.summary.clone().unwrap_or_default(),
            ..Incident::default()
        }
    }
}

/// Input parameters for the close_incident tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloseIncidentInput {
    /// Numeric identifier of the incident to close.
    pub incident_id: i64,
}

/// Input parameters for the list_incidents tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListIncidentsInput {
    /// Number of most recent incidents to return (default: 20, max: 100).
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ListIncidentsInput {
    /// Returns the requested page size, clamped to `1..=MAX_LIST_LIMIT`.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_sanitize() {
        let input = CreateIncidentInput {
            customer: "  jsilva ".to_string(),
            summary: "\tVPN down\n".to_string(),
            description: Some("   ".to_string()),
        }
        .sanitize();

        assert_eq!(input.customer, "jsilva");
        assert_eq!(input.summary, "VPN down");
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_update_input_has_updates() {
        let input = UpdateIncidentInput {
            incident_id: 42,
            status: Some(" ".to_string()),
            code: None,
            summary: None,
        }
        .sanitize();
        assert!(!input.has_updates());

        let input = UpdateIncidentInput {
            incident_id: 42,
            status: None,
            code: Some(" WIP ".to_string()),
            summary: None,
        }
        .sanitize();
        assert!(input.has_updates());
        assert_eq!(input.to_incident().code, "WIP");
        assert!(input.to_incident().status.is_empty());
    }

    #[test]
    fn test_list_input_effective_limit() {
        assert_eq!(ListIncidentsInput::default().effective_limit(), 20);
        assert_eq!(ListIncidentsInput { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(ListIncidentsInput { limit: Some(5) }.effective_limit(), 5);
        assert_eq!(ListIncidentsInput { limit: Some(5000) }.effective_limit(), 100);
    }

    #[test]
    fn test_inputs_deserialize() {
        let input: UpdateIncidentInput =
            serde_json::from_value(serde_json::json!({ "incident_id": 7, "status": "Fechado" }))
                .unwrap();
        assert_eq!(input.incident_id, 7);
        assert_eq!(input.status.as_deref(), Some("Fechado"));

        let input: ListIncidentsInput = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(input.limit, None);
    }
}
