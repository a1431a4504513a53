//! Translation between [`Incident`] and the service's XML.
//!
//! Decoding is strict about the two numeric fields: an `id` or `ref_num`
//! that is not an integer is a [`CasdmError::Parse`], never a silent zero.
//! Collections keep one result per record so a single bad record does not
//! hide the rest of the page. Text is copied verbatim, whitespace included,
//! and a document whose root is not the expected element is a
//! [`CasdmError::Xml`].

use quick_xml::escape::escape;

use crate::error::CasdmError;
use crate::models::{
    Incident, IncidentCollection, IncidentRecord, RestAccess, StatusShim, UpdateShim,
};
use crate::xml::parse_document;

/// A decoded `<collection_in>`.
#[derive(Debug)]
pub struct DecodedCollection {
    /// Records in this page, when the service sent a numeric `COUNT`.
    pub count: Option<u64>,
    /// Offset of the first record, when numeric.
    pub start: Option<u64>,
    /// Records matching the query, when numeric.
    pub total_count: Option<u64>,
    /// One entry per `<in>`, in document order.
    pub entries: Vec<Result<Incident, CasdmError>>,
}

impl DecodedCollection {
    /// Number of records in the response, including ones that failed to decode.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the response carried no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records that failed to decode.
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.is_err()).count()
    }

    /// Returns every incident, failing on the first record that did not decode.
    pub fn into_incidents(self) -> Result<Vec<Incident>, CasdmError> {
        self.entries.into_iter().collect()
    }

    /// Returns every incident, replacing records that did not decode with
    /// [`Incident::default()`]. Length and order match the response.
    pub fn into_incidents_lossy(self) -> Vec<Incident> {
        self.entries
            .into_iter()
            .map(|entry| match entry {
                Ok(incident) => incident,
                Err(e) => {
                    tracing::warn!(error = %e, "Substituting empty incident for undecodable record");
                    Incident::default()
                }
            })
            .collect()
    }
}

/// Decodes a single `<in>` response.
pub fn decode_incident(xml: &str) -> Result<Incident, CasdmError> {
    let record = IncidentRecord::from_element(&parse_document(xml, "in")?);
    to_incident(&record)
}

/// Decodes a `<collection_in>` response.
///
/// Only a malformed wrapper fails the call; per-record failures are kept in
/// [`DecodedCollection::entries`].
pub fn decode_collection(xml: &str) -> Result<DecodedCollection, CasdmError> {
    let collection = IncidentCollection::from_element(&parse_document(xml, "collection_in")?);

    let entries = collection.records.iter().map(to_incident).collect();

    Ok(DecodedCollection {
        count: collection.count.parse().ok(),
        start: collection.start.parse().ok(),
        total_count: collection.total_count.parse().ok(),
        entries,
    })
}

/// Decodes the `<rest_access>` response to an authentication request.
pub fn decode_access(xml: &str) -> Result<RestAccess, CasdmError> {
    Ok(RestAccess::from_element(&parse_document(xml, "rest_access")?))
}

/// Converts a wire record into an [`Incident`].
pub fn to_incident(record: &IncidentRecord) -> Result<Incident, CasdmError> {
    Ok(Incident {
        status: record.status.common_name.clone(),
        code: record.status.rel_attr.clone(),
        summary: record.summary.clone(),
        id: parse_number("id", &record.id)?,
        number: parse_number("ref_num", &record.ref_num)?,
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<i64, CasdmError> {
    value
        .parse()
        .map_err(|e| CasdmError::parse(field, value, e))
}

/// Encodes the partial `<in>` sent with `PUT /in/{id}`.
///
/// Only the status (as `COMMON_NAME`), its code (as `REL_ATTR`) and the
/// summary are carried; empty values are left out so the service keeps its
/// current value for them.
pub fn encode_update(incident: &Incident) -> Result<String, CasdmError> {
    let rel_attr = non_empty(&incident.code);
    let common_name = non_empty(&incident.status);

    let status = (rel_attr.is_some() || common_name.is_some()).then_some(StatusShim {
        rel_attr,
        common_name,
    });

    let shim = UpdateShim {
        status,
        summary: non_empty(&incident.summary),
    };

    Ok(quick_xml::se::to_string(&shim)?)
}

/// Encodes the `<in>` sent with `POST /in` to open an incident for `customer`.
///
/// The create endpoint takes a different element set from updates, so the
/// body is written directly with every value escaped.
pub fn encode_create(customer: &str, summary: &str, description: &str) -> String {
    let mut body = String::with_capacity(96 + customer.len() + summary.len() + description.len());
    body.push_str(r#"<in><customer COMMON_NAME=""#);
    body.push_str(&escape(customer));
    body.push_str(r#""/><summary>"#);
    body.push_str(&escape(summary));
    body.push_str("</summary><description>");
    body.push_str(&escape(description));
    body.push_str("</description></in>");
    body
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
