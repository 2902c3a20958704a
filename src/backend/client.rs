//! HTTP client for a single media-management backend.

use crate::config::{ApiKeyAuth, BackendSettings};
use crate::error::{ArrlinkError, Result};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Request timeout applied to every backend call.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the shared HTTP client used by all backends and providers.
///
/// Clones of a `reqwest::Client` share one connection pool.
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

/// Authenticated client for one backend (Radarr or Sonarr).
#[derive(Debug, Clone)]
pub struct BackendClient {
    name: String,
    settings: BackendSettings,
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a client for a named backend from its settings.
    pub fn new(name: &str, settings: BackendSettings, http: reqwest::Client) -> Self {
        Self {
            name: name.to_string(),
            settings,
            http,
        }
    }

    /// Backend name as used in errors and formatted output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the full URL for an endpoint: `{url}{base_path}/{endpoint}`,
    /// trimming exactly one trailing slash from the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.settings.url.strip_suffix('/').unwrap_or(&self.settings.url);
        format!(
            "{}{}/{}",
            base,
            self.settings.base_path,
            endpoint.trim_start_matches('/')
        )
    }

    /// Verify the client is usable before any network call.
    fn check_configured(&self) -> Result<()> {
        if self.settings.url.is_empty() {
            return Err(ArrlinkError::Misconfigured {
                backend: self.name.clone(),
                reason: "base URL is empty".to_string(),
            });
        }
        if url::Url::parse(&self.settings.url).is_err() {
            return Err(ArrlinkError::Misconfigured {
                backend: self.name.clone(),
                reason: format!("base URL '{}' is not a valid URL", self.settings.url),
            });
        }
        if self.settings.api_key.is_empty() {
            return Err(ArrlinkError::Misconfigured {
                backend: self.name.clone(),
                reason: "API key is empty".to_string(),
            });
        }
        Ok(())
    }

    /// Issue a request and decode the JSON response.
    ///
    /// Query parameters are accepted for every method; DELETE uses them
    /// for removal flags. No retries: a failed call surfaces immediately.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        self.check_configured()?;

        let url = self.endpoint_url(endpoint);
        debug!(backend = %self.name, %method, %url, "backend request");

        let mut request = self.http.request(method, &url).query(params);

        request = match self.settings.auth {
            ApiKeyAuth::Header => request.header("X-Api-Key", &self.settings.api_key),
            ApiKeyAuth::Query => request.query(&[("apikey", self.settings.api_key.as_str())]),
        };

        if let Some(json) = body {
            request = request.json(json);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                ArrlinkError::Unavailable {
                    backend: self.name.clone(),
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                }
            } else {
                ArrlinkError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArrlinkError::RequestFailed {
                backend: self.name.clone(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        // DELETE and command endpoints may return an empty body.
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// GET an endpoint with no query parameters.
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::GET, endpoint, &[], None).await
    }

    /// GET an endpoint with query parameters.
    pub async fn get_with(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, endpoint, params, None).await
    }

    /// POST a JSON body to an endpoint.
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, endpoint, &[], Some(body)).await
    }

    /// PUT a JSON body to an endpoint.
    pub async fn put(&self, endpoint: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, endpoint, &[], Some(body)).await
    }

    /// DELETE an endpoint, with query parameters for removal flags.
    pub async fn delete(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(Method::DELETE, endpoint, params, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendSettings;

    fn client(url: &str, api_key: &str) -> BackendClient {
        BackendClient::new(
            "radarr",
            BackendSettings {
                url: url.to_string(),
                api_key: api_key.to_string(),
                ..BackendSettings::default()
            },
            build_http_client(),
        )
    }

    #[test]
    fn test_endpoint_url_trims_one_trailing_slash() {
        let c = client("http://localhost:7878/", "key");
        assert_eq!(
            c.endpoint_url("movie"),
            "http://localhost:7878/api/v3/movie"
        );

        let c = client("http://localhost:7878", "key");
        assert_eq!(
            c.endpoint_url("/movie/lookup"),
            "http://localhost:7878/api/v3/movie/lookup"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let c = client("http://localhost:7878", "");
        let err = c.get("movie").await.unwrap_err();
        assert!(matches!(err, ArrlinkError::Misconfigured { .. }));
    }

    #[tokio::test]
    async fn test_empty_url_fails_before_network() {
        let c = client("", "key");
        let err = c.get("movie").await.unwrap_err();
        assert!(matches!(err, ArrlinkError::Misconfigured { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_network() {
        let c = client("not a url", "key");
        let err = c.get("movie").await.unwrap_err();
        assert!(matches!(err, ArrlinkError::Misconfigured { .. }));
    }
}
