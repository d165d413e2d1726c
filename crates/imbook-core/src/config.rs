//! Configuration for imbook-core
//!
//! Provider endpoints and credentials, the per-provider timeout, cache
//! bounds and history settings. Loadable from TOML or JSON with environment
//! overrides for secrets.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_COMMERCE_APP_ID: &str = "IMBOOK_COMMERCE_APP_ID";
pub const ENV_COMMERCE_AFFILIATE_ID: &str = "IMBOOK_COMMERCE_AFFILIATE_ID";
pub const ENV_GENERIC_INDEX_API_KEY: &str = "IMBOOK_GENERIC_INDEX_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "IMBOOK_TIMEOUT_SECS";
pub const ENV_HISTORY_PATH: &str = "IMBOOK_HISTORY_PATH";

/// Top-level resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Commerce catalog; omitted means the provider is not configured
    pub commerce: Option<CommerceConfig>,
    pub registry: RegistryConfig,
    pub generic_index: GenericIndexConfig,
    /// Per-provider call timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    pub cache: CacheConfig,
    pub history: HistoryConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            commerce: None,
            registry: RegistryConfig::default(),
            generic_index: GenericIndexConfig::default(),
            timeout_secs: 15,
            user_agent: crate::http::DEFAULT_USER_AGENT.to_string(),
            cache: CacheConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Commerce catalog credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommerceConfig {
    pub application_id: String,
    #[serde(default)]
    pub affiliate_id: Option<String>,
    #[serde(default = "default_commerce_url")]
    pub base_url: String,
}

fn default_commerce_url() -> String {
    "https://app.rakuten.co.jp/services/api/BooksBook/Search/20170404".to_string()
}

impl CommerceConfig {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            affiliate_id: None,
            base_url: default_commerce_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openbd.jp/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenericIndexConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Results per request, the index caps this at 40
    pub max_results: u32,
}

impl Default for GenericIndexConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/books/v1".to_string(),
            max_results: 20,
        }
    }
}

/// Result cache bounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
    /// Aggregate serialized size of all cached records
    pub max_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            max_entries: 256,
            max_bytes: 4 * 1024 * 1024,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Recent-query history settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    /// Backing file; `None` uses the platform data directory
    pub path: Option<PathBuf>,
    /// Keep history in memory only
    pub in_memory: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            path: None,
            in_memory: false,
        }
    }
}

impl HistoryConfig {
    /// Resolved backing file, `None` when in-memory or no data dir exists
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if self.in_memory {
            return None;
        }
        self.path.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("imbook").join("recent_queries.json"))
        })
    }
}

impl ResolverConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a `.toml` or `.json` file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_toml(&contents),
        }
    }

    /// Apply overrides from `IMBOOK_*` environment variables
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    pub(crate) fn apply_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(app_id) = lookup(ENV_COMMERCE_APP_ID).filter(|v| !v.trim().is_empty()) {
            match self.commerce.as_mut() {
                Some(commerce) => commerce.application_id = app_id,
                None => self.commerce = Some(CommerceConfig::new(app_id)),
            }
        }
        if let Some(affiliate_id) = lookup(ENV_COMMERCE_AFFILIATE_ID) {
            if let Some(commerce) = self.commerce.as_mut() {
                commerce.affiliate_id = Some(affiliate_id);
            }
        }
        if let Some(key) = lookup(ENV_GENERIC_INDEX_API_KEY) {
            self.generic_index.api_key = Some(key);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                ConfigError::Parse(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_SECS, timeout))
            })?;
        }
        if let Some(path) = lookup(ENV_HISTORY_PATH) {
            self.history.path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=60).contains(&self.timeout_secs) {
            return Err(ConfigError::OutOfRange(
                "timeout_secs must be between 1 and 60".to_string(),
            ));
        }

        if let Some(commerce) = &self.commerce {
            if commerce.application_id.trim().is_empty() {
                return Err(ConfigError::MissingField("commerce.application_id".to_string()));
            }
        }

        if !(1..=40).contains(&self.generic_index.max_results) {
            return Err(ConfigError::OutOfRange(
                "generic_index.max_results must be between 1 and 40".to_string(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::OutOfRange("cache.ttl_secs must be positive".to_string()));
        }

        if self.cache.max_entries == 0 || self.cache.max_bytes == 0 {
            return Err(ConfigError::OutOfRange(
                "cache.max_entries and cache.max_bytes must be positive".to_string(),
            ));
        }

        if self.history.capacity == 0 {
            return Err(ConfigError::OutOfRange(
                "history.capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
