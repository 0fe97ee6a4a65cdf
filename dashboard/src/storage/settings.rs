//! Settings file management

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::DashboardError;
use crate::filesys::file::File;
use crate::logs::LogLevel;
use crate::server::guard::RouteGuardOptions;

/// Overrides the backend base URL from the settings file
pub const API_URL_ENV: &str = "PRINTNET_API_URL";

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON logs on stdout
    #[serde(default)]
    pub log_json: bool,

    /// Also write daily-rotated log files under the storage layout
    #[serde(default)]
    pub log_to_file: bool,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Local server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Route gating for the local server
    #[serde(default)]
    pub route_guard: RouteGuardOptions,

    /// How long notifications stay visible, in milliseconds
    #[serde(default = "default_notify_timeout_ms")]
    pub notify_timeout_ms: u64,

    /// Pause before navigating away after a job is queued, in milliseconds
    #[serde(default = "default_navigate_delay_ms")]
    pub navigate_delay_ms: u64,
}

fn default_notify_timeout_ms() -> u64 {
    5000
}

fn default_navigate_delay_ms() -> u64 {
    800
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_to_file: false,
            backend: BackendSettings::default(),
            server: ServerSettings::default(),
            route_guard: RouteGuardOptions::default(),
            notify_timeout_ms: default_notify_timeout_ms(),
            navigate_delay_ms: default_navigate_delay_ms(),
        }
    }
}

impl Settings {
    /// Read the settings file, falling back to defaults when it is absent
    pub async fn load(file: &File) -> Result<Self, DashboardError> {
        if !file.exists().await {
            debug!("No settings file at {:?}, using defaults", file.path());
            return Ok(Self::default());
        }
        let settings: Self = file
            .read_json()
            .await
            .with_context(|| format!("invalid settings file {:?}", file.path()))?;
        Ok(settings)
    }

    /// Apply environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            info!("Backend URL overridden by {}", API_URL_ENV);
            self.backend.base_url = url.trim().to_string();
        }
        self
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend API
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

fn default_backend_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

/// Local HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
