//! Moodle MCP Server
//!
//! Exposes a fixed catalog of Moodle LMS course operations (enrollment,
//! assignments, quizzes, submissions, grading) as MCP tools over stdio.
//!
//! ## Configuration
//!
//! Required environment variables, validated before the server starts:
//!
//! - `MOODLE_API_URL` — base URL of the Moodle instance
//! - `MOODLE_API_TOKEN` — web-service authentication token
//! - `MOODLE_COURSE_ID` — id of the course the tools operate on
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "moodle": {
//!       "command": "moodle-mcp",
//!       "env": {
//!         "MOODLE_API_URL": "https://moodle.example.edu",
//!         "MOODLE_API_TOKEN": "...",
//!         "MOODLE_COURSE_ID": "2"
//!       }
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use moodle_gateway::{HttpGateway, ServerConfig};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::sync::Arc;

mod tools;

use tools::MoodleService;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ServerConfig::from_env().context("Moodle configuration is incomplete")?;
    let gateway = HttpGateway::new(&config).context("failed to create Moodle HTTP client")?;

    log::info!("Starting Moodle MCP server for course {}", config.course_id);

    let service = MoodleService::new(Arc::new(gateway), config.course_id);
    let server = service.serve(stdio()).await?;

    // Wait for shutdown
    server.waiting().await?;

    log::info!("Moodle MCP server stopped");
    Ok(())
}
