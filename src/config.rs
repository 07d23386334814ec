//! Issueboard configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main issueboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API configuration
    pub github: GithubConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required environment variables are set. Call this early
    /// in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        self.github.get_token()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .issueboard.yml
        let local_config = PathBuf::from(".issueboard.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/issueboard/issueboard.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("issueboard").join("issueboard.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Environment variable containing the API token
    #[serde(rename = "token-env")]
    pub token_env: String,

    /// GraphQL endpoint URL
    pub endpoint: String,

    /// Items requested per page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token_env: "GITHUB_TOKEN".to_string(),
            endpoint: "https://api.github.com/graphql".to_string(),
            page_size: 25,
            timeout_ms: 30_000,
        }
    }
}

impl GithubConfig {
    /// Read the API token from the configured environment variable
    pub fn get_token(&self) -> Result<String> {
        std::env::var(&self.token_env)
            .map_err(|_| eyre::eyre!("GitHub token not found. Set the {} environment variable.", self.token_env))
    }
}
