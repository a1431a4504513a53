//! XML shapes exchanged with the CASDM REST service.
//!
//! These mirror the service's schema, which repeats the same
//! `id`/`REL_ATTR`/`COMMON_NAME` attribute triple and `<link>` element at
//! several nesting levels. Every value is a string on the wire; conversion to
//! typed values happens in [`crate::codec`].

use serde::Serialize;

use crate::xml::Element;

/// A `<link href=".." rel=".."/>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    /// Target URL.
    pub href: String,

    /// Relation, usually `self`.
    pub rel: String,

    /// Text content; normally empty.
    pub text: String,
}

/// The `<status>` reference nested in an incident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRef {
    /// Persistent id of the status object (e.g. `crs:5200`).
    pub id: String,

    /// Status code, e.g. `OP` or `CL`.
    pub rel_attr: String,

    /// Status display name, e.g. `Aberto`.
    pub common_name: String,

    /// Link to the status object.
    pub link: Link,
}

/// A single `<in>` (incident) element as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentRecord {
    /// Numeric identifier, as text.
    pub id: String,

    /// Persistent id (`cr:<id>`).
    pub rel_attr: String,

    /// Display name, normally the reference number.
    pub common_name: String,

    /// Current status.
    pub status: StatusRef,

    /// Link to this incident.
    pub link: Link,

    /// Human-facing reference number, as text.
    pub ref_num: String,

    /// One-line summary.
    pub summary: String,

    /// Free-text description.
    pub description: String,
}

/// A `<collection_in>` response wrapping zero or more incidents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentCollection {
    /// Number of records in this page.
    pub count: String,

    /// 1-based offset of the first record.
    pub start: String,

    /// Number of records matching the query.
    pub total_count: String,

    /// Link to the collection.
    pub link: Link,

    /// The incidents, in the order the service sent them.
    pub records: Vec<IncidentRecord>,
}

/// The `<rest_access>` response to an authentication request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestAccess {
    /// Link to the access record.
    pub link: Link,

    /// Opaque key for the `X-AccessKey` header.
    pub access_key: String,

    /// Expiry as sent by the service (epoch seconds on most installations).
    pub expiration_date: String,
}

impl Link {
    fn from_parent(parent: &Element) -> Self {
        parent
            .child("link")
            .map(|link| Self {
                href: link.attribute("href").to_string(),
                rel: link.attribute("rel").to_string(),
                text: link.text.clone(),
            })
            .unwrap_or_default()
    }
}

impl StatusRef {
    fn from_parent(parent: &Element) -> Self {
        parent
            .child("status")
            .map(|status| Self {
                id: status.attribute("id").to_string(),
                rel_attr: status.attribute("REL_ATTR").to_string(),
                common_name: status.attribute("COMMON_NAME").to_string(),
                link: Link::from_parent(status),
            })
            .unwrap_or_default()
    }
}

impl IncidentRecord {
    pub(crate) fn from_element(element: &Element) -> Self {
        Self {
            id: element.attribute("id").to_string(),
            rel_attr: element.attribute("REL_ATTR").to_string(),
            common_name: element.attribute("COMMON_NAME").to_string(),
            status: StatusRef::from_parent(element),
            link: Link::from_parent(element),
            ref_num: element.child_text("ref_num").to_string(),
            summary: element.child_text("summary").to_string(),
            description: element.child_text("description").to_string(),
        }
    }
}

impl IncidentCollection {
    pub(crate) fn from_element(element: &Element) -> Self {
        Self {
            count: element.attribute("COUNT").to_string(),
            start: element.attribute("START").to_string(),
            total_count: element.attribute("TOTAL_COUNT").to_string(),
            link: Link::from_parent(element),
            records: element
                .children_named("in")
                .map(IncidentRecord::from_element)
                .collect(),
        }
    }
}

impl RestAccess {
    pub(crate) fn from_element(element: &Element) -> Self {
        Self {
            link: Link::from_parent(element),
            access_key: element.child_text("access_key").to_string(),
            expiration_date: element.child_text("expiration_date").to_string(),
        }
    }
}

/// The partial `<in>` accepted by `PUT /in/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename = "in")]
pub struct UpdateShim<'a> {
    /// New status, omitted when neither name nor code changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusShim<'a>>,

    /// New summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
}

/// The `<status/>` element of an [`UpdateShim`].
#[derive(Debug, Serialize)]
pub struct StatusShim<'a> {
    /// Status code.
    #[serde(rename = "@REL_ATTR", skip_serializing_if = "Option::is_none")]
    pub rel_attr: Option<&'a str>,

    /// Status display name.
    #[serde(rename = "@COMMON_NAME", skip_serializing_if = "Option::is_none")]
    pub common_name: Option<&'a str>,
}
