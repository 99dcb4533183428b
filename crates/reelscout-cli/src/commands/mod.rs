pub mod browse;
pub mod config;
pub mod live;
pub mod watchlist;

use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use movie_browser_catalog::{CatalogError, OphimClient};
use movie_browser_config::{Config, PathManager};
use movie_browser_core::{FileKeyValueStore, WatchlistStore};
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs: effective config, catalog client, paths.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub catalog: Arc<OphimClient>,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let catalog = OphimClient::from_config(&config.catalog)
            .wrap_err("Failed to create catalog client")?;
        debug!("Using catalog at {}", catalog.base_url());

        Ok(Self {
            paths,
            config,
            catalog: Arc::new(catalog),
        })
    }

    /// Watchlist backed by `<data>/storage/<key>.json`.
    pub fn open_watchlist(&self) -> WatchlistStore {
        let storage = Arc::new(FileKeyValueStore::new(self.paths.storage_dir()));
        WatchlistStore::initialize(storage, self.config.watchlist.storage_key.clone())
    }
}

/// Report a catalog failure, hinting at a retry when the error is transient.
pub fn catalog_failure(context: &str, err: CatalogError) -> color_eyre::Report {
    if err.is_transient() {
        eyre!("{}: {} (the catalog may be temporarily unavailable, try again)", context, err)
    } else {
        eyre!("{}: {}", context, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_failure_hints_retry_only_when_transient() {
        let report = catalog_failure("Failed to load new releases", CatalogError::Timeout);
        assert!(report.to_string().contains("try again"));

        let report = catalog_failure(
            "Failed to load movie x",
            CatalogError::NotFound("x".to_string()),
        );
        assert_eq!(report.to_string(), "Failed to load movie x: movie not found: x");
    }
}
