//! Configuration management

use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
///
/// Sources, lowest priority first: built-in defaults, `config.{toml,json,yaml}`
/// in the config directory, `BETTIM_ADMIN_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root of the remote Bettim API (scheme + host, optional path prefix)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Version segment prefixed to every admin path (e.g. "v1")
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Third-party form relay receiving contact submissions
    #[serde(default)]
    pub contact_relay_url: Option<String>,

    /// Directory overriding the embedded legal documents
    #[serde(default)]
    pub docs_dir: Option<PathBuf>,
}

fn default_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            api_base_url: default_api_base_url(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            contact_relay_url: None,
            docs_dir: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(self) -> Result<Self> {
        let base = url::Url::parse(&self.api_base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("api_base_url must be http(s), got {}", self.api_base_url);
        }
        if self.api_version.contains('/') {
            bail!("api_version must be a single path segment, got {}", self.api_version);
        }
        if let Some(relay) = &self.contact_relay_url {
            url::Url::parse(relay)?;
        }
        Ok(self)
    }
}

/// Directory holding the optional config file.
///
/// `BETTIM_ADMIN_CONFIG_DIR` wins over the platform config directory.
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BETTIM_ADMIN_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("app", "bettim", "bettim-admin")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let config = ::config::Config::builder()
        // Start with defaults
        .set_default("port", i64::from(default_port()))?
        .set_default("api_base_url", default_api_base_url())?
        .set_default("api_version", default_api_version())?
        .set_default("request_timeout_secs", default_request_timeout_secs())?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy())
                .required(false),
        )
        // Override with environment variables (BETTIM_ADMIN_PORT, BETTIM_ADMIN_API_BASE_URL, etc.)
        .add_source(
            ::config::Environment::with_prefix("BETTIM_ADMIN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize::<Config>()?.validate()
}
