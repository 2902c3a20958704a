//! Arrlink - Radarr/Sonarr MCP bridge
//!
//! An MCP server exposing two media-management backends (Radarr for
//! movies, Sonarr for TV series) behind a single tool surface, with
//! optional Plex/Jellyfin providers consulted for watched status.
//!
//! # Overview
//!
//! Arrlink allows an AI assistant to:
//! - Browse, search, and filter both libraries (year, downloaded,
//!   watched, cast)
//! - Add, update, and remove movies and series
//! - Inspect and manage download queues, history, and wanted items
//! - Read calendars, system status, and disk space
//! - Trigger maintenance commands (refresh, rescan, RSS sync, backup)
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `backend` - Authenticated HTTP clients for Radarr/Sonarr
//! - `media` - Entity normalization (movies, series, episodes, queue)
//! - `watch` - Watched-status providers and OR-combining resolver
//! - `query` - Predicate filtering over normalized entities
//! - `mcp` - JSON-RPC protocol, tool catalog, dispatch, stdio server
//! - `format` - Line-oriented response formatting
//! - `context` - Explicit per-process application context
//!
//! # Example
//!
//! ```rust,no_run
//! use arrlink::config::Settings;
//! use arrlink::mcp::McpServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut server = McpServer::new(settings);
//!     server.run().await
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod mcp;
pub mod media;
pub mod query;
pub mod watch;

pub use error::{ArrlinkError, Result};
