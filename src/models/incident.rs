//! The caller-facing incident model.

use serde::{Deserialize, Serialize};

/// Status name the service uses for a closed incident.
pub const CLOSED_STATUS: &str = "Fechado";

/// An incident as seen by callers of this crate.
///
/// Every field is optional in practice: an empty string or zero means "not
/// set", which is how partial updates are expressed to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Status display name (the status element's `COMMON_NAME`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    /// Status code (the status element's `REL_ATTR`), used by the service
    /// to drive state transitions.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,

    /// One-line summary.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,

    /// Service-assigned identifier.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,

    /// Human-facing reference number.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub number: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl Incident {
    /// Creates an incident carrying only a status, the usual shape of an update.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Self::default()
        }
    }

    /// Sets the status code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the summary.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Returns true if this is the zero-valued incident.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns the summary or a placeholder when it is empty.
    pub fn display_summary(&self) -> &str {
        if self.summary.is_empty() {
            "(no summary)"
        } else {
            &self.summary
        }
    }

    /// Returns the status or a placeholder when it is empty.
    pub fn display_status(&self) -> &str {
        if self.status.is_empty() {
            "Unknown"
        } else {
            &self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Incident::default().is_empty());
        assert!(!Incident::with_status(CLOSED_STATUS).is_empty());
    }

    #[test]
    fn test_builder() {
        let incident = Incident::with_status("Open").code("OP").summary("Printer jam");
        assert_eq!(incident.status, "Open");
        assert_eq!(incident.code, "OP");
        assert_eq!(incident.summary, "Printer jam");
        assert_eq!(incident.id, 0);
    }

    #[test]
    fn test_json_skips_unset_fields() {
        let json = serde_json::to_value(Incident::with_status("Open")).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "Open" }));

        let back: Incident = serde_json::from_value(serde_json::json!({ "id": 7 })).unwrap();
        assert_eq!(back.id, 7);
        assert!(back.status.is_empty());
    }

    #[test]
    fn test_display_placeholders() {
        let incident = Incident::default();
        assert_eq!(incident.display_summary(), "(no summary)");
        assert_eq!(incident.display_status(), "Unknown");
    }
}
