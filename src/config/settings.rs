//! Configuration settings for Arrlink.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub radarr: BackendSettings,
    pub sonarr: BackendSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plex: Option<PlexSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jellyfin: Option<JellyfinSettings>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// API key injection strategy for a backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyAuth {
    /// Send the key as an `X-Api-Key` header (current Radarr/Sonarr).
    #[default]
    Header,
    /// Send the key as an `apikey` query parameter (legacy deployments).
    Query,
}

impl std::str::FromStr for ApiKeyAuth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" => Ok(ApiKeyAuth::Header),
            "query" | "apikey" => Ok(ApiKeyAuth::Query),
            _ => Err(format!("Unknown auth strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeyAuth::Header => write!(f, "header"),
            ApiKeyAuth::Query => write!(f, "query"),
        }
    }
}

/// Connection settings for one media-management backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL, e.g. `http://localhost:7878`.
    pub url: String,
    /// API key. Required before any request is issued.
    pub api_key: String,
    /// API base path appended to the URL.
    pub base_path: String,
    /// How the API key is attached to requests.
    pub auth: ApiKeyAuth,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            base_path: "/api/v3".to_string(),
            auth: ApiKeyAuth::Header,
        }
    }
}

impl BackendSettings {
    fn radarr_default() -> Self {
        Self {
            url: "http://localhost:7878".to_string(),
            ..Self::default()
        }
    }

    fn sonarr_default() -> Self {
        Self {
            url: "http://localhost:8989".to_string(),
            ..Self::default()
        }
    }
}

/// Plex watch-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlexSettings {
    /// Base URL, e.g. `http://localhost:32400`.
    pub url: String,
    /// Plex authentication token.
    pub token: String,
}

/// Jellyfin watch-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JellyfinSettings {
    /// Base URL, e.g. `http://localhost:8096`.
    pub url: String,
    /// Jellyfin API key.
    pub api_key: String,
    /// User whose play state is consulted.
    pub user_id: String,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, the default location, or the
    /// environment when no config file exists.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Self::from_env())
        }
    }

    /// Build settings from environment variables.
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok();

        let mut settings = Settings {
            radarr: BackendSettings::radarr_default(),
            sonarr: BackendSettings::sonarr_default(),
            ..Settings::default()
        };

        if let Some(url) = env("RADARR_URL") {
            settings.radarr.url = url;
        }
        if let Some(key) = env("RADARR_API_KEY") {
            settings.radarr.api_key = key;
        }
        if let Some(path) = env("RADARR_BASE_PATH") {
            settings.radarr.base_path = path;
        }

        if let Some(url) = env("SONARR_URL") {
            settings.sonarr.url = url;
        }
        if let Some(key) = env("SONARR_API_KEY") {
            settings.sonarr.api_key = key;
        }
        if let Some(path) = env("SONARR_BASE_PATH") {
            settings.sonarr.base_path = path;
        }

        if let Some(url) = env("PLEX_URL") {
            settings.plex = Some(PlexSettings {
                url,
                token: env("PLEX_TOKEN").unwrap_or_default(),
            });
        }

        if let Some(url) = env("JELLYFIN_URL") {
            settings.jellyfin = Some(JellyfinSettings {
                url,
                api_key: env("JELLYFIN_API_KEY").unwrap_or_default(),
                user_id: env("JELLYFIN_USER_ID").unwrap_or_default(),
            });
        }

        settings
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ArrlinkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("arrlink")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.radarr.base_path, "/api/v3");
        assert_eq!(settings.radarr.auth, ApiKeyAuth::Header);
        assert!(settings.plex.is_none());
        assert!(settings.jellyfin.is_none());
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml_str = r#"
            [radarr]
            url = "http://10.0.0.23:7878"
            api_key = "abc123"

            [sonarr]
            url = "http://10.0.0.23:8989"
            api_key = "def456"
            auth = "query"

            [plex]
            url = "http://10.0.0.23:32400"
            token = "plex-token"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.radarr.url, "http://10.0.0.23:7878");
        assert_eq!(settings.radarr.api_key, "abc123");
        assert_eq!(settings.radarr.base_path, "/api/v3");
        assert_eq!(settings.sonarr.auth, ApiKeyAuth::Query);
        assert_eq!(settings.plex.as_ref().unwrap().token, "plex-token");
        assert!(settings.jellyfin.is_none());

        let serialized = toml::to_string_pretty(&settings).unwrap();
        let reparsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.sonarr.auth, ApiKeyAuth::Query);
    }

    #[test]
    fn test_auth_from_str() {
        assert_eq!("header".parse::<ApiKeyAuth>().unwrap(), ApiKeyAuth::Header);
        assert_eq!("query".parse::<ApiKeyAuth>().unwrap(), ApiKeyAuth::Query);
        assert!("bearer".parse::<ApiKeyAuth>().is_err());
    }
}
