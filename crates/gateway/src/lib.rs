//! Typed gateway over the Moodle web-service REST API.
//!
//! Every remote operation is one HTTP request against
//! `{base}/webservice/rest/server.php` carrying the authentication token,
//! the JSON output selector, and a `wsfunction` naming the operation.
//! The [`LmsGateway`] trait is the seam the MCP tool handlers depend on;
//! [`HttpGateway`] is the reqwest-backed implementation.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{HttpGateway, LmsGateway, SaveGradeRequest};
pub use config::ServerConfig;
pub use error::{GatewayError, Result};
