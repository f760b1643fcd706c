use client_core::config as core_config;
use client_core::error::CoreError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub server: ServerSettings,
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    /// Identity backend origin; endpoint paths carry the `/v2.0` prefix.
    pub base_url: String,
    /// Value sent in the `platform` header and used to pick the SSO block-list.
    #[serde(default)]
    pub platform: Platform,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Login URL of the messaging server; only its origin is used.
    pub login_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_app_version")]
    pub app_version: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            app_version: default_app_version(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint; span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    #[default]
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            _ => Err(format!("Invalid platform: {}", s)),
        }
    }
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_service_name() -> String {
    "daakia-login".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load `config/base.yaml` (if present) overlaid with `APP_*` variables.
    pub fn load() -> Result<Self, CoreError> {
        let settings: Settings = core_config::load(&configuration_file())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(CoreError::config("backend.base_url must not be empty"));
        }

        Url::parse(&self.backend.base_url).map_err(|e| {
            CoreError::config(format!(
                "backend.base_url is not a valid URL ({}): {}",
                self.backend.base_url, e
            ))
        })?;

        self.server_origin()?;

        if self.client.app_version.trim().is_empty() {
            return Err(CoreError::config("client.app_version must not be empty"));
        }

        Ok(())
    }

    /// Origin (`scheme://host[:port]`) of the configured messaging server.
    pub fn server_origin(&self) -> Result<String, CoreError> {
        server_origin(&self.server.login_url)
            .ok_or_else(|| CoreError::config(format!("Invalid server URL: {}", self.server.login_url)))
    }
}

/// Extract the origin from a login URL, `None` when it cannot be parsed or
/// has no host.
pub fn server_origin(login_url: &str) -> Option<String> {
    let url = Url::parse(login_url).ok()?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}

fn configuration_file() -> PathBuf {
    let base_path = std::env::current_dir().unwrap_or_default();

    // Allow running from the workspace root as well as from the crate directory
    let configuration_directory = if base_path.ends_with("daakia-auth") {
        base_path.join("config")
    } else {
        base_path.join("daakia-auth").join("config")
    };

    configuration_directory.join("base.yaml")
}
