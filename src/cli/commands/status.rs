//! Status command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Show the configured backends and watch providers.
pub fn run_status(settings: &Settings) -> Result<()> {
    Output::header("Arrlink Status");

    Output::kv("Radarr", &describe_backend(&settings.radarr.url, &settings.radarr.api_key));
    Output::kv("Sonarr", &describe_backend(&settings.sonarr.url, &settings.sonarr.api_key));

    match &settings.plex {
        Some(plex) => Output::kv("Plex", &plex.url),
        None => Output::kv("Plex", "not configured"),
    }
    match &settings.jellyfin {
        Some(jellyfin) => Output::kv("Jellyfin", &jellyfin.url),
        None => Output::kv("Jellyfin", "not configured"),
    }

    if settings.radarr.api_key.is_empty() {
        Output::warning("Radarr API key is missing; movie tools will fail.");
    }
    if settings.sonarr.api_key.is_empty() {
        Output::warning("Sonarr API key is missing; series tools will fail.");
    }

    Output::info("Run 'arrlink mcp' to start the MCP server.");
    Ok(())
}

fn describe_backend(url: &str, api_key: &str) -> String {
    let key_state = if api_key.is_empty() {
        "no API key"
    } else {
        "API key set"
    };
    format!("{} ({})", url, key_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_backend() {
        assert_eq!(
            describe_backend("http://localhost:7878", ""),
            "http://localhost:7878 (no API key)"
        );
        assert_eq!(
            describe_backend("http://localhost:8989", "secret"),
            "http://localhost:8989 (API key set)"
        );
    }
}
