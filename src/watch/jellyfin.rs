//! Jellyfin watch provider.

use super::WatchProvider;
use crate::config::JellyfinSettings;
use crate::error::{ArrlinkError, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Watch provider backed by a Jellyfin server.
///
/// Authenticates with an `api_key` query parameter and reads play state
/// from each item's `UserData.PlayCount` for the configured user.
pub struct JellyfinProvider {
    settings: JellyfinSettings,
    http: reqwest::Client,
}

impl JellyfinProvider {
    pub fn new(settings: JellyfinSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    fn items_url(&self) -> String {
        let base = self.settings.url.strip_suffix('/').unwrap_or(&self.settings.url);
        format!("{}/Users/{}/Items", base, self.settings.user_id)
    }

    async fn get_items(&self, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let response = self
            .http
            .get(self.items_url())
            .query(params)
            .query(&[("api_key", self.settings.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ArrlinkError::Provider("jellyfin".to_string(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(ArrlinkError::Provider(
                "jellyfin".to_string(),
                format!("status {}", response.status().as_u16()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ArrlinkError::Provider("jellyfin".to_string(), e.to_string()))?;

        Ok(body
            .get("Items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    fn play_count(item: &Value) -> i64 {
        item.get("UserData")
            .and_then(|u| u.get("PlayCount"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl WatchProvider for JellyfinProvider {
    fn name(&self) -> &str {
        "jellyfin"
    }

    async fn is_movie_watched(&self, title: &str) -> Result<bool> {
        let items = self
            .get_items(&[("IncludeItemTypes", "Movie"), ("SearchTerm", title)])
            .await?;
        // First match wins; common titles are not disambiguated.
        let Some(movie) = items.first() else {
            return Ok(false);
        };
        Ok(Self::play_count(movie) > 0)
    }

    async fn is_series_watched(&self, title: &str) -> Result<bool> {
        let items = self
            .get_items(&[("IncludeItemTypes", "Series"), ("SearchTerm", title)])
            .await?;
        let Some(series) = items.first() else {
            return Ok(false);
        };

        let series_id = series
            .get("Id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let episodes = self
            .get_items(&[("ParentId", series_id.as_str()), ("IncludeItemTypes", "Episode")])
            .await?;

        if episodes.is_empty() {
            return Ok(false);
        }
        Ok(episodes.iter().all(|ep| Self::play_count(ep) > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::build_http_client;
    use serde_json::json;

    #[test]
    fn test_items_url() {
        let provider = JellyfinProvider::new(
            JellyfinSettings {
                url: "http://localhost:8096/".to_string(),
                api_key: "k".to_string(),
                user_id: "user1".to_string(),
            },
            build_http_client(),
        );
        assert_eq!(provider.items_url(), "http://localhost:8096/Users/user1/Items");
    }

    #[test]
    fn test_play_count_extraction() {
        assert_eq!(
            JellyfinProvider::play_count(&json!({"UserData": {"PlayCount": 2}})),
            2
        );
        assert_eq!(JellyfinProvider::play_count(&json!({"UserData": {}})), 0);
        assert_eq!(JellyfinProvider::play_count(&json!({})), 0);
    }
}
