//! MCP tool inputs for the CASDM server.
//!
//! This module contains the parameter types for the MCP tools that expose
//! the incident operations.

mod inputs;

pub use inputs::*;
