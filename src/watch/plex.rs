//! Plex watch provider.

use super::WatchProvider;
use crate::config::PlexSettings;
use crate::error::{ArrlinkError, Result};
use async_trait::async_trait;
use serde_json::Value;

// Plex library search type codes.
const TYPE_MOVIE: &str = "2";
const TYPE_SERIES: &str = "4";

/// Watch provider backed by a Plex server.
///
/// Authenticates with the `X-Plex-Token` header and reads play state
/// from each item's `UserData.viewCount`.
pub struct PlexProvider {
    settings: PlexSettings,
    http: reqwest::Client,
}

impl PlexProvider {
    pub fn new(settings: PlexSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    fn url(&self, path: &str) -> String {
        let base = self.settings.url.strip_suffix('/').unwrap_or(&self.settings.url);
        format!("{}{}", base, path)
    }

    async fn get_metadata(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let response = self
            .http
            .get(self.url(path))
            .query(params)
            .header("X-Plex-Token", &self.settings.token)
            .send()
            .await
            .map_err(|e| ArrlinkError::Provider("plex".to_string(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(ArrlinkError::Provider(
                "plex".to_string(),
                format!("status {}", response.status().as_u16()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ArrlinkError::Provider("plex".to_string(), e.to_string()))?;

        Ok(body
            .get("MediaContainer")
            .and_then(|c| c.get("Metadata"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn search(&self, title: &str, type_code: &str) -> Result<Vec<Value>> {
        self.get_metadata("/library/search", &[("query", title), ("type", type_code)])
            .await
    }

    fn view_count(item: &Value) -> i64 {
        item.get("UserData")
            .and_then(|u| u.get("viewCount"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl WatchProvider for PlexProvider {
    fn name(&self) -> &str {
        "plex"
    }

    async fn is_movie_watched(&self, title: &str) -> Result<bool> {
        let items = self.search(title, TYPE_MOVIE).await?;
        // First match wins; common titles are not disambiguated.
        let Some(movie) = items.first() else {
            return Ok(false);
        };
        Ok(Self::view_count(movie) > 0)
    }

    async fn is_series_watched(&self, title: &str) -> Result<bool> {
        let items = self.search(title, TYPE_SERIES).await?;
        let Some(series) = items.first() else {
            return Ok(false);
        };

        let rating_key = series
            .get("ratingKey")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let episodes = self
            .get_metadata(&format!("/library/metadata/{}/children", rating_key), &[])
            .await?;

        if episodes.is_empty() {
            return Ok(false);
        }
        Ok(episodes.iter().all(|ep| Self::view_count(ep) > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::build_http_client;
    use serde_json::json;

    #[test]
    fn test_url_trims_trailing_slash() {
        let provider = PlexProvider::new(
            PlexSettings {
                url: "http://localhost:32400/".to_string(),
                token: "t".to_string(),
            },
            build_http_client(),
        );
        assert_eq!(
            provider.url("/library/search"),
            "http://localhost:32400/library/search"
        );
    }

    #[test]
    fn test_view_count_extraction() {
        assert_eq!(
            PlexProvider::view_count(&json!({"UserData": {"viewCount": 3}})),
            3
        );
        assert_eq!(PlexProvider::view_count(&json!({})), 0);
    }
}
