use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
}

/// Where the movie catalog lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Prefix for relative image paths returned by the catalog
    #[serde(default = "default_image_cdn")]
    pub image_cdn: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Live search tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_base_url() -> String {
    "https://ophim1.com/v1/api".to_string()
}

fn default_image_cdn() -> String {
    "https://img.ophim.live/uploads/movies/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_chars() -> usize {
    2
}

fn default_max_results() -> usize {
    8
}

fn default_storage_key() -> String {
    "watchlist".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_cdn: default_image_cdn(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            max_results: default_max_results(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

/// Storage keys double as file names, so only `[A-Za-z0-9_-]` is allowed.
pub fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present, defaults otherwise.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.catalog.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("catalog.base_url must be an http(s) URL: {}", base_url));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(anyhow::anyhow!("catalog.timeout_secs must be greater than zero"));
        }
        if self.search.min_query_chars == 0 {
            return Err(anyhow::anyhow!("search.min_query_chars must be at least 1"));
        }
        if self.search.max_results == 0 {
            return Err(anyhow::anyhow!("search.max_results must be at least 1"));
        }
        if !is_valid_storage_key(&self.watchlist.storage_key) {
            return Err(anyhow::anyhow!(
                "watchlist.storage_key may only contain letters, digits, '_' and '-': {:?}",
                self.watchlist.storage_key
            ));
        }
        Ok(())
    }
}
