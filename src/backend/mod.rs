//! Backend client abstraction for Arrlink.
//!
//! One [`BackendClient`] instance per media manager (Radarr, Sonarr),
//! handling URL construction, API-key injection, and error mapping.

mod client;

pub use client::{build_http_client, BackendClient, REQUEST_TIMEOUT_SECS};

use serde::{Deserialize, Serialize};

/// Which backend(s) a tool invocation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Radarr,
    Sonarr,
    Both,
}

impl Service {
    /// Parse a `service` tool argument.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "radarr" => Some(Service::Radarr),
            "sonarr" => Some(Service::Sonarr),
            "both" => Some(Service::Both),
            _ => None,
        }
    }

    pub fn includes_radarr(&self) -> bool {
        matches!(self, Service::Radarr | Service::Both)
    }

    pub fn includes_sonarr(&self) -> bool {
        matches!(self, Service::Sonarr | Service::Both)
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Radarr => write!(f, "radarr"),
            Service::Sonarr => write!(f, "sonarr"),
            Service::Both => write!(f, "both"),
        }
    }
}
