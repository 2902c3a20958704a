//! CLI module for Arrlink.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Arrlink - Radarr/Sonarr MCP bridge
///
/// Exposes Radarr and Sonarr libraries, queues, and maintenance commands
/// as MCP tools, with optional Plex/Jellyfin watched-status lookup.
#[derive(Parser, Debug)]
#[command(name = "arrlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Show the configured backends and providers
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
