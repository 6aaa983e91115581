use crate::application::refresh_client::{
    DEFAULT_TRANSIENT_MESSAGE, DEFAULT_UNAVAILABLE_MESSAGE, RefreshSettings,
};
use crate::domain::dashboard::DEFAULT_REGION_LIMIT;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    /// Unset leaves reqwest's default (no timeout)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_unavailable_message")]
    pub unavailable_message: String,
    #[serde(default = "default_transient_message")]
    pub transient_message: String,
    #[serde(default)]
    pub show_transient_errors: bool,
    /// 0 disables polling
    #[serde(default)]
    pub poll_interval_secs: u64,
    #[serde(default = "default_region_limit")]
    pub region_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            unavailable_message: default_unavailable_message(),
            transient_message: default_transient_message(),
            show_transient_errors: false,
            poll_interval_secs: 0,
            region_limit: default_region_limit(),
        }
    }
}

impl DashboardSettings {
    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            region_limit: self.region_limit,
            unavailable_message: self.unavailable_message.clone(),
            transient_message: self.transient_message.clone(),
            show_transient_errors: self.show_transient_errors,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_unavailable_message() -> String {
    DEFAULT_UNAVAILABLE_MESSAGE.to_string()
}

fn default_transient_message() -> String {
    DEFAULT_TRANSIENT_MESSAGE.to_string()
}

fn default_region_limit() -> usize {
    DEFAULT_REGION_LIMIT
}

/// Load `config/dashboard.*` overlaid with `SBC__SECTION__KEY` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("SBC")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    parse_app_config(settings)
}

pub fn parse_app_config(settings: config::Config) -> anyhow::Result<AppConfig> {
    let app_config: AppConfig = settings
        .try_deserialize()
        .context("Invalid dashboard configuration")?;

    if app_config.backend.base_url.trim().is_empty() {
        anyhow::bail!("backend.base_url must not be empty");
    }
    if app_config.dashboard.region_limit == 0 {
        anyhow::bail!("dashboard.region_limit must be at least 1");
    }

    Ok(app_config)
}
