//! MCP (Model Context Protocol) server for Arrlink.
//!
//! Allows AI assistants like Claude to manage Radarr and Sonarr as tools.
//! Implements JSON-RPC 2.0 over stdio.

pub mod handlers;
mod protocol;
mod server;
mod tools;

pub use server::McpServer;
pub use tools::get_tools;
