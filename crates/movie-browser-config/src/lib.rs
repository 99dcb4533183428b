pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, SearchConfig, WatchlistConfig, is_valid_storage_key};
pub use paths::{PathManager, container_base_path};
