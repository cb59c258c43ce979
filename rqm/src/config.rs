//! requestmanager configuration types and loading

use eyre::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::retry::RetryPolicy;
use crate::scheduler::SchedulerConfig;

const LOCAL_CONFIG_FILE: &str = ".requestmanager.yml";
const APP_DIR: &str = "requestmanager";
const USER_CONFIG_FILE: &str = "requestmanager.yml";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MusicBrainz server to talk to
    pub server: ServerConfig,

    /// Request pacing
    pub scheduler: SchedulerConfig,

    /// Retry limits for failed requests
    pub retry: RetryPolicy,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate().context("Invalid scheduler configuration")?;
        Url::parse(&self.server.base_url).context(format!("Invalid server base-url: {}", self.server.base_url))?;
        Ok(())
    }

    /// Load configuration
    ///
    /// An explicit path must load. Otherwise the first readable file in
    /// [`Config::search_paths`] wins, and with none the defaults apply.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        debug!(?config_path, "Config::load: called");
        if let Some(path) = config_path {
            return Self::from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        match Self::load_first(&Self::search_paths()) {
            Some(config) => Ok(config),
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Project-local `.requestmanager.yml`, then the per-user file
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(APP_DIR).join(USER_CONFIG_FILE));
        }
        paths
    }

    /// First candidate that exists and parses; broken files are skipped
    fn load_first(candidates: &[PathBuf]) -> Option<Self> {
        candidates
            .iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::from_file(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{:#}", e), "Skipping config file");
                    None
                }
            })
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

/// MusicBrainz server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server root; any path on it is kept as a prefix of every request path
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://musicbrainz.org".to_string(),
            timeout_ms: 30_000,
            user_agent: format!("requestmanager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
