//! Configuration module for Arrlink.
//!
//! Handles loading and managing backend and watch-provider settings.

mod settings;

pub use settings::{
    ApiKeyAuth, BackendSettings, GeneralSettings, JellyfinSettings, PlexSettings, Settings,
};
