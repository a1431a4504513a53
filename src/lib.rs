//! # casdm
//!
//! A client for the incident REST/XML interface of CA Service Desk Manager,
//! plus an MCP (Model Context Protocol) server that exposes it as tools.
//!
//! ## Features
//!
//! - **Session**: one `/rest_access` round trip yields the access key used by
//!   every later request
//! - **Incidents**: create, read, update, close and list
//! - **Codec**: translation between the service's attribute-heavy XML and a
//!   flat [`Incident`](models::Incident)
//! - **Security**: access keys and passwords are never logged or exposed in
//!   error messages
//!
//! ## Architecture
//!
//! - [`transport`] - one HTTP request with the fixed CASDM headers
//! - [`codec`] - XML encoding and decoding of incidents
//! - [`session`] - authentication and the incident operations
//! - [`models`] - the caller-facing incident and the wire-level XML shapes
//! - [`config`] - configuration loading from environment variables
//! - [`error`] - error types with message sanitization
//! - [`server`] - MCP server implementation with tool routing
//! - [`tools`] - tool input parameter structs
//!
//! ## Configuration
//!
//! The binary requires:
//!
//! - `CASDM_BASE_URL`: Base URL of the REST service (e.g. `https://sdm.example.com:8050/caisd-rest`)
//! - `CASDM_USERNAME` / `CASDM_PASSWORD`: Credentials for `/rest_access`
//!
//! Optional:
//! - `CASDM_TIMEOUT_SECS`: Request timeout (default 30, `0` disables)
//! - `RUST_LOG`: Log level (e.g., `casdm=debug`)
//!
//! ## Example
//!
//! Using the [`Session`](session::Session) directly:
//!
//! ```ignore
//! use casdm::session::Session;
//!
//! async fn example() -> Result<(), casdm::error::CasdmError> {
//!     let session = Session::authenticate("https://sdm.example.com/caisd-rest", "user:pass").await?;
//!
//!     let created = session.create("jsilva", "VPN down", "Since 9am").await?;
//!     println!("Opened incident {}", created.number);
//!
//!     for incident in session.list(10).await?.into_incidents()? {
//!         println!("{}: {}", incident.number, incident.summary);
//!     }
//!
//!     session.close(created.id).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod session;
pub mod tools;
pub mod transport;
mod xml;
