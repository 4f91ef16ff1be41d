// src/core/config_manager.rs
//! Application configuration: `config.yaml` sections per environment, then
//! environment variable overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::presenter::{PresenterOptions, DEFAULT_EXPORT_FILE_NAME};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub service: ServiceConfig,
    pub presenter: PresenterConfig,
    pub server: ServerConfig,
    pub presets_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Only bounds establishing the connection; a running search is never cut off.
    pub connect_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            api_key: None,
            connect_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    pub extended_controls: bool,
    pub export_file_name: String,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            extended_controls: true,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl PresenterConfig {
    pub fn options(&self) -> PresenterOptions {
        PresenterOptions {
            extended_controls: self.extended_controls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Largest JSON body accepted. Export requests post whole result sets back.
    pub json_limit_mib: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            json_limit_mib: 32,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EnvironmentSection {
    service: ServiceConfig,
    presenter: PresenterConfig,
    server: ServerConfig,
    presets_path: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: EnvironmentSection,
    production: EnvironmentSection,
}

impl ConfigManager {
    /// Load the given file (usually [`CONFIG_FILE`]) if it exists, then apply
    /// environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let content = if path.exists() {
            Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            )
        } else {
            info!("{} not found, using defaults", path.display());
            None
        };

        Self::from_yaml(content.as_deref(), &environment, |key| std::env::var(key).ok())
    }

    fn get_environment() -> String {
        std::env::var("LUCY_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn from_yaml(
        content: Option<&str>,
        environment: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file: ConfigFile = match content {
            Some(text) => serde_yaml::from_str(text).context("Failed to parse config.yaml")?,
            None => ConfigFile::default(),
        };

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };

        let mut config = Self {
            environment: environment.to_string(),
            service: section.service,
            presenter: section.presenter,
            server: section.server,
            presets_path: section
                .presets_path
                .unwrap_or_else(|| PathBuf::from("searches.toml")),
            log_file: section.log_file,
        };

        if let Some(url) = lookup("JOBSPY_API_URL") {
            config.service.base_url = url;
        }
        if let Some(key) = lookup("JOBSPY_API_KEY") {
            config.service.api_key = Some(key);
        }
        if let Some(port) = lookup("LUCY_PORT") {
            config.server.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("LUCY_PORT must be a valid port number"))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
local:
  service:
    base_url: http://localhost:9000
  presenter:
    extended_controls: false
production:
  service:
    base_url: https://jobs.internal
    api_key: secret
    connect_timeout_seconds: 10
  server:
    address: 0.0.0.0
    port: 80
    json_limit_mib: 64
  log_file: /var/log/lucy.json
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = ConfigManager::from_yaml(None, "local", no_env).unwrap();
        assert_eq!(config.service, ServiceConfig::default());
        assert!(config.presenter.extended_controls);
        assert_eq!(config.presenter.export_file_name, "lucy_results.csv");
        assert_eq!(config.presets_path, PathBuf::from("searches.toml"));
        assert_eq!(config.service.connect_timeout_seconds, 30);
        assert_eq!(config.server.json_limit_mib, 32);
    }

    #[test]
    fn test_sections_per_environment() {
        let local = ConfigManager::from_yaml(Some(YAML), "local", no_env).unwrap();
        assert_eq!(local.service.base_url, "http://localhost:9000");
        assert_eq!(local.service.connect_timeout_seconds, 30);
        assert!(!local.presenter.extended_controls);

        let production = ConfigManager::from_yaml(Some(YAML), "production", no_env).unwrap();
        assert_eq!(production.service.api_key.as_deref(), Some("secret"));
        assert_eq!(production.service.connect_timeout_seconds, 10);
        assert_eq!(production.server.port, 80);
        assert_eq!(production.server.json_limit_mib, 64);
        assert_eq!(production.log_file, Some(PathBuf::from("/var/log/lucy.json")));
    }

    #[test]
    fn test_environment_overrides() {
        let lookup = |key: &str| match key {
            "JOBSPY_API_URL" => Some("http://override:1".to_string()),
            "LUCY_PORT" => Some("9191".to_string()),
            _ => None,
        };
        let config = ConfigManager::from_yaml(Some(YAML), "local", lookup).unwrap();
        assert_eq!(config.service.base_url, "http://override:1");
        assert_eq!(config.server.port, 9191);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let lookup = |key: &str| (key == "LUCY_PORT").then(|| "eighty".to_string());
        assert!(ConfigManager::from_yaml(None, "local", lookup).is_err());
    }
}
