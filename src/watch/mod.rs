//! Watched-status resolution for Arrlink.
//!
//! Provides a trait-based interface over optional watch providers (Plex,
//! Jellyfin). Each configured provider is asked independently and the
//! verdicts are OR-combined: a title is watched if any provider says so.
//! A provider failure counts as "no verdict" and never aborts the
//! resolution. With no provider configured, series fall back to a
//! download-completeness heuristic and movies resolve to false.

mod jellyfin;
mod plex;

pub use jellyfin::JellyfinProvider;
pub use plex::PlexProvider;

use crate::config::Settings;
use crate::error::Result;
use crate::media::{Movie, Series};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

/// Kind of title being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Series,
}

/// Outcome of one resolution: the combined answer plus each provider's
/// individual verdict. Computed per query, never persisted.
#[derive(Debug, Clone)]
pub struct WatchVerdict {
    pub watched: bool,
    pub sources: Vec<(String, bool)>,
}

/// Trait for watch-status providers.
///
/// A provider searches its own library by exact title and reports
/// whether the first match has been played. Ambiguous titles are not
/// disambiguated; the first search hit wins (known limitation).
#[async_trait]
pub trait WatchProvider: Send + Sync {
    /// Provider name as reported in verdicts and logs.
    fn name(&self) -> &str;

    /// Whether the matched movie has a nonzero view count.
    async fn is_movie_watched(&self, title: &str) -> Result<bool>;

    /// Whether every episode of the matched series has been played.
    async fn is_series_watched(&self, title: &str) -> Result<bool>;
}

/// Combines zero or more watch providers into a single answer.
pub struct WatchResolver {
    providers: Vec<Box<dyn WatchProvider>>,
}

impl WatchResolver {
    pub fn new(providers: Vec<Box<dyn WatchProvider>>) -> Self {
        Self { providers }
    }

    /// Build the provider list from configuration. Absent sections mean
    /// absent providers.
    pub fn from_settings(settings: &Settings, http: reqwest::Client) -> Self {
        let mut providers: Vec<Box<dyn WatchProvider>> = Vec::new();

        if let Some(plex) = &settings.plex {
            providers.push(Box::new(PlexProvider::new(plex.clone(), http.clone())));
        }
        if let Some(jellyfin) = &settings.jellyfin {
            providers.push(Box::new(JellyfinProvider::new(
                jellyfin.clone(),
                http.clone(),
            )));
        }

        Self { providers }
    }

    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Ask every configured provider concurrently and OR the verdicts.
    ///
    /// Failed providers are logged and skipped; they contribute no
    /// verdict rather than an error.
    pub async fn resolve(&self, title: &str, kind: MediaKind) -> WatchVerdict {
        let lookups = self.providers.iter().map(|provider| async move {
            let outcome = match kind {
                MediaKind::Movie => provider.is_movie_watched(title).await,
                MediaKind::Series => provider.is_series_watched(title).await,
            };
            match outcome {
                Ok(watched) => Some((provider.name().to_string(), watched)),
                Err(e) => {
                    debug!(provider = provider.name(), title, "provider failed: {}", e);
                    None
                }
            }
        });

        let sources: Vec<(String, bool)> = join_all(lookups).await.into_iter().flatten().collect();
        let watched = sources.iter().any(|(_, verdict)| *verdict);

        WatchVerdict { watched, sources }
    }

    /// Resolve watched status for a series, falling back to the
    /// download-completeness heuristic when no provider is configured.
    pub async fn is_series_watched(&self, series: &Series) -> bool {
        if !self.has_providers() {
            // Fully downloaded stands in for watched when nothing better
            // is available; a series without statistics is unknown.
            return match &series.statistics {
                Some(stats) => stats.episode_file_count >= stats.episode_count,
                None => false,
            };
        }
        self.resolve(&series.title, MediaKind::Series).await.watched
    }

    /// Resolve watched status for a movie. With no provider configured
    /// there is no native signal and the answer is always false.
    pub async fn is_movie_watched(&self, movie: &Movie) -> bool {
        if !self.has_providers() {
            return false;
        }
        self.resolve(&movie.title, MediaKind::Movie).await.watched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArrlinkError;
    use serde_json::json;

    /// Provider returning a fixed verdict, or an error when verdict is None.
    struct FixedProvider {
        name: String,
        verdict: Option<bool>,
    }

    impl FixedProvider {
        fn new(name: &str, verdict: Option<bool>) -> Box<dyn WatchProvider> {
            Box::new(Self {
                name: name.to_string(),
                verdict,
            })
        }
    }

    #[async_trait]
    impl WatchProvider for FixedProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn is_movie_watched(&self, _title: &str) -> Result<bool> {
            self.verdict
                .ok_or_else(|| ArrlinkError::Provider(self.name.clone(), "down".to_string()))
        }

        async fn is_series_watched(&self, _title: &str) -> Result<bool> {
            self.verdict
                .ok_or_else(|| ArrlinkError::Provider(self.name.clone(), "down".to_string()))
        }
    }

    fn series_with_counts(files: i64, episodes: i64) -> Series {
        Series::from_value(&json!({
            "id": 1,
            "title": "Test Series",
            "statistics": {"episodeFileCount": files, "episodeCount": episodes}
        }))
    }

    #[tokio::test]
    async fn test_or_property_any_true_wins() {
        let resolver = WatchResolver::new(vec![
            FixedProvider::new("plex", Some(false)),
            FixedProvider::new("jellyfin", Some(true)),
        ]);
        let verdict = resolver.resolve("Title", MediaKind::Series).await;
        assert!(verdict.watched);
        assert_eq!(verdict.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_or_property_survives_provider_failure() {
        let resolver = WatchResolver::new(vec![
            FixedProvider::new("plex", None),
            FixedProvider::new("jellyfin", Some(true)),
        ]);
        let verdict = resolver.resolve("Title", MediaKind::Movie).await;
        assert!(verdict.watched);
        // Failed provider contributes no verdict at all.
        assert_eq!(verdict.sources.len(), 1);
        assert_eq!(verdict.sources[0].0, "jellyfin");
    }

    #[tokio::test]
    async fn test_all_providers_failing_means_unwatched() {
        let resolver = WatchResolver::new(vec![
            FixedProvider::new("plex", None),
            FixedProvider::new("jellyfin", None),
        ]);
        let verdict = resolver.resolve("Title", MediaKind::Series).await;
        assert!(!verdict.watched);
        assert!(verdict.sources.is_empty());
    }

    #[tokio::test]
    async fn test_series_fallback_heuristic() {
        let resolver = WatchResolver::new(vec![]);
        assert!(resolver.is_series_watched(&series_with_counts(10, 10)).await);
        assert!(resolver.is_series_watched(&series_with_counts(12, 10)).await);
        assert!(!resolver.is_series_watched(&series_with_counts(5, 10)).await);

        // A series without statistics has no signal.
        let bare = Series::from_value(&json!({"id": 2, "title": "Bare"}));
        assert!(!resolver.is_series_watched(&bare).await);
    }

    #[tokio::test]
    async fn test_movie_without_providers_is_never_watched() {
        let resolver = WatchResolver::new(vec![]);
        let movie = Movie::from_value(&json!({"id": 1, "title": "Heat", "hasFile": true}));
        assert!(!resolver.is_movie_watched(&movie).await);
    }

    #[tokio::test]
    async fn test_provider_overrides_fallback() {
        // With a provider configured, the heuristic does not apply.
        let resolver = WatchResolver::new(vec![FixedProvider::new("plex", Some(false))]);
        let fully_downloaded = series_with_counts(10, 10);
        assert!(!resolver.is_series_watched(&fully_downloaded).await);
    }
}
