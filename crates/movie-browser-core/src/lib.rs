pub mod browse;
pub mod debounce;
pub mod search;
pub mod storage;
pub mod watchlist;

#[cfg(test)]
mod test_support;

pub use browse::{page_window, similar_movies, MAX_VISIBLE_PAGES, SIMILAR_MOVIES_LIMIT};
pub use debounce::{schedule_after, CancelHandle, Debouncer};
pub use search::{SearchController, SearchPhase, SearchSettings, SearchState};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use watchlist::WatchlistStore;
