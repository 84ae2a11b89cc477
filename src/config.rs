use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::github;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("GITHUB_TOKEN is not set (config file or environment)")]
    MissingToken,
}

/// Top-level configuration loaded from .pr-risk-analyzer.toml.
/// All fields are optional; the service works with only GITHUB_TOKEN set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to the GITHUB_TOKEN env var.
    pub token: Option<String>,

    /// Override for the GitHub API base URL (used by tests against a stub).
    pub api_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP endpoint binds to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from .pr-risk-analyzer.toml in the current
    /// directory, falling back to defaults when the file doesn't exist.
    /// GITHUB_TOKEN from the environment overrides the file value.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".pr-risk-analyzer.toml");
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                config.github.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token. Absence is a startup configuration error,
    /// never a per-request one: callers resolve this once before building
    /// the pipeline.
    pub fn github_token(&self) -> Result<String, ConfigError> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    pub fn github_api_base_url(&self) -> String {
        self.github
            .api_base_url
            .clone()
            .unwrap_or_else(|| github::DEFAULT_API_BASE_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert!(config.github.api_base_url.is_none());
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
token = "ghp_test"
api_base_url = "http://localhost:9999"

[server]
port = 8080
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.github_api_base_url(), "http://localhost:9999");
    }

    #[test]
    fn test_api_base_url_defaults_to_github() {
        let config = Config::default();
        assert_eq!(config.github_api_base_url(), "https://api.github.com");
    }
}
