//! Application context for Arrlink.
//!
//! One explicit, immutable context object owns the backend clients and
//! the watch resolver. Handlers receive it by reference, so concurrent
//! and test-isolated instances need no global state.

use crate::backend::{build_http_client, BackendClient};
use crate::config::Settings;
use crate::watch::WatchResolver;

/// Shared per-process state for tool handling.
pub struct AppContext {
    pub radarr: BackendClient,
    pub sonarr: BackendClient,
    pub watch: WatchResolver,
}

impl AppContext {
    /// Build the context from loaded settings. A single HTTP client is
    /// created here and cloned into every backend and provider so they
    /// share one connection pool.
    pub fn new(settings: &Settings) -> Self {
        let http = build_http_client();

        Self {
            radarr: BackendClient::new("radarr", settings.radarr.clone(), http.clone()),
            sonarr: BackendClient::new("sonarr", settings.sonarr.clone(), http.clone()),
            watch: WatchResolver::from_settings(settings, http),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_construction() {
        let settings = Settings::default();
        let ctx = AppContext::new(&settings);
        assert_eq!(ctx.radarr.name(), "radarr");
        assert_eq!(ctx.sonarr.name(), "sonarr");
        assert!(!ctx.watch.has_providers());
    }

    #[test]
    fn test_context_with_providers() {
        let mut settings = Settings::default();
        settings.plex = Some(crate::config::PlexSettings {
            url: "http://localhost:32400".to_string(),
            token: "token".to_string(),
        });
        let ctx = AppContext::new(&settings);
        assert!(ctx.watch.has_providers());
    }
}
