//! Data models for the CASDM REST service.
//!
//! This module contains the caller-facing [`Incident`] and the wire-level
//! XML structures it is translated to and from.

mod incident;
mod wire;

pub use incident::*;
pub use wire::*;
