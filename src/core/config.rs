//! Configuration - YAML file plus environment overrides
//!
//! Lookup order (later wins):
//! 1. Built-in defaults
//! 2. `<config_dir>/larder/config.yaml`
//! 3. `LARDER_DATA_DIR`, `LARDER_OFFLINE`, `LARDER_LOG` environment variables
//!
//! Command line flags are applied on top by the CLI.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const CONFIG_FILE: &str = "config.yaml";

/// How shortage reports resolve categories over the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// One ingredient at a time, in recipe order
    #[default]
    Sequential,
    /// Local rules per ingredient first, then remote lookups concurrently
    Parallel,
}

impl std::fmt::Display for LookupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupPolicy::Sequential => write!(f, "sequential"),
            LookupPolicy::Parallel => write!(f, "parallel"),
        }
    }
}

/// Remote category lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Whether remote lookups are attempted at all
    pub enabled: bool,

    /// Free-text product search endpoint
    pub search_url: String,

    /// Product-by-barcode endpoint (barcode and `.json` are appended)
    pub product_url: String,

    /// Preferred language suffix for product names (e.g. "en", "hu")
    pub language: String,

    /// Upper bound on a single lookup, in milliseconds
    pub timeout_ms: u64,

    /// Quiet interval before an as-you-type lookup fires, in milliseconds
    pub debounce_ms: u64,

    /// Sequential or parallel lookups for shortage reports
    pub policy: LookupPolicy,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_url: "https://world.openfoodfacts.org/cgi/search.pl".to_string(),
            product_url: "https://world.openfoodfacts.org/api/v0/product".to_string(),
            language: "en".to_string(),
            timeout_ms: 3000,
            debounce_ms: 500,
            policy: LookupPolicy::Sequential,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Meal inspiration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspirationConfig {
    pub enabled: bool,

    /// Random meal endpoint
    pub url: String,

    pub timeout_ms: u64,

    /// Display names for dishes, keyed by the service's English name
    pub translations: BTreeMap<String, String>,
}

impl Default for InspirationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://www.themealdb.com/api/json/v1/1/random.php".to_string(),
            timeout_ms: 3000,
            translations: BTreeMap::new(),
        }
    }
}

impl InspirationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Errors reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the collections are stored (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,

    /// Default log level when neither -v nor RUST_LOG is given
    pub log_level: Option<String>,

    pub lookup: LookupConfig,

    pub inspiration: InspirationConfig,
}

impl Config {
    /// Load configuration from the user config file and the environment
    ///
    /// A missing file yields defaults; an unreadable or invalid one is
    /// reported and ignored.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring config file");
                Self::default()
            }),
            _ => Self::default(),
        };
        config.apply_env();
        config
    }

    /// Load configuration from a specific YAML file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Location of the user config file, if a home directory exists
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "larder").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("LARDER_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(offline) = std::env::var("LARDER_OFFLINE") {
            if matches!(offline.to_lowercase().as_str(), "1" | "true" | "yes") {
                self.go_offline();
            }
        }
        if let Ok(level) = std::env::var("LARDER_LOG") {
            self.log_level = Some(level);
        }
    }

    /// Disable every network-bound feature
    pub fn go_offline(&mut self) {
        self.lookup.enabled = false;
        self.inspiration.enabled = false;
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "larder")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".larder"))
    }
}
