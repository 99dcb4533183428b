use crate::storage::KeyValueStore;
use movie_browser_models::{MovieSummary, WatchlistEntry};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The user's saved movies, mirrored to a key-value slot on every change.
///
/// Entries are unique by `id` and keep insertion order. Mutation and persist
/// run under one lock, so concurrent `add`/`remove` calls never interleave.
/// Storage failures are logged and never returned: the in-memory list is
/// authoritative for the session.
pub struct WatchlistStore {
    entries: Mutex<Vec<WatchlistEntry>>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    changes: watch::Sender<Vec<WatchlistEntry>>,
}

impl WatchlistStore {
    /// Load the watchlist from `storage`. Never fails: a missing, unreadable
    /// or corrupt blob yields an empty list.
    pub fn initialize(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = load_entries(storage.as_ref(), &key);
        let (changes, _) = watch::channel(entries.clone());

        Self {
            entries: Mutex::new(entries),
            storage,
            key,
            changes,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Append `movie` unless an entry with the same id exists.
    pub fn add(&self, movie: MovieSummary) {
        let mut entries = self.lock();
        if entries.iter().any(|entry| entry.id == movie.id) {
            debug!("Watchlist already contains {}", movie.id);
        } else {
            info!("Adding {} ({}) to watchlist", movie.id, movie.name);
            entries.push(movie);
            self.publish(&entries);
        }
        self.persist(&entries);
    }

    /// Remove the entry with `movie_id`, if any.
    pub fn remove(&self, movie_id: &str) {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|entry| entry.id != movie_id);
        if entries.len() != before {
            info!("Removed {} from watchlist", movie_id);
            self.publish(&entries);
        } else {
            debug!("Watchlist does not contain {}", movie_id);
        }
        self.persist(&entries);
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        if removed > 0 {
            entries.clear();
            info!("Cleared {} movies from watchlist", removed);
            self.publish(&entries);
        }
        self.persist(&entries);
        removed
    }

    pub fn contains(&self, movie_id: &str) -> bool {
        self.lock().iter().any(|entry| entry.id == movie_id)
    }

    pub fn snapshot(&self) -> Vec<WatchlistEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Receiver that observes the list after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<WatchlistEntry>> {
        self.changes.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WatchlistEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, entries: &[WatchlistEntry]) {
        self.changes.send_replace(entries.to_vec());
    }

    fn persist(&self, entries: &[WatchlistEntry]) {
        let blob = match serde_json::to_string(entries) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Failed to serialize watchlist: {}", e);
                return;
            }
        };

        match self.storage.set(&self.key, &blob) {
            Ok(()) => debug!("Watchlist saved ({} entries)", entries.len()),
            Err(e) => warn!(
                "Failed to persist watchlist ({} entries kept in memory): {}",
                entries.len(),
                e
            ),
        }
    }
}

fn load_entries(storage: &dyn KeyValueStore, key: &str) -> Vec<WatchlistEntry> {
    let blob = match storage.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!("No stored watchlist under {:?}", key);
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to read stored watchlist: {}. Starting empty.", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<WatchlistEntry>>(&blob) {
        Ok(entries) => {
            let entries = dedup_by_id(entries);
            info!("Loaded watchlist ({} entries)", entries.len());
            entries
        }
        Err(e) => {
            warn!("Stored watchlist is corrupt: {}. Starting empty.", e);
            Vec::new()
        }
    }
}

/// Keep the first entry for each id.
fn dedup_by_id(entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore, StorageError};

    const KEY: &str = "watchlist";

    fn movie(id: &str, name: &str) -> MovieSummary {
        MovieSummary::new(id, name)
    }

    fn ids(entries: &[WatchlistEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
            })
        }
    }

    #[test]
    fn test_add_remove_scenario() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        store.add(movie("m1", "Foo"));
        store.add(movie("m2", ""));
        store.remove("m1");

        assert_eq!(store.snapshot(), vec![movie("m2", "")]);
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = WatchlistStore::initialize(storage.clone(), KEY);
        store.add(movie("m1", "Foo"));
        store.add(movie("m2", "Bar"));
        let mut changes = store.subscribe();

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(changes.has_changed().unwrap());
        assert!(changes.borrow_and_update().is_empty());
        assert_eq!(storage.get(KEY).unwrap().as_deref(), Some("[]"));

        assert_eq!(store.clear(), 0);
        assert!(!changes.has_changed().unwrap());
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        store.add(movie("m1", "Foo"));
        let once = store.snapshot();
        store.add(movie("m1", "Foo"));
        assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn test_add_dedups_by_id_not_slug() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        let mut first = movie("m1", "Foo");
        first.slug = "foo".to_string();
        let mut renamed = movie("m1", "Foo (Remastered)");
        renamed.slug = "foo-remastered".to_string();
        let mut other = movie("m2", "Other");
        other.slug = "foo".to_string();

        store.add(first.clone());
        store.add(renamed);
        store.add(other);

        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["m1", "m2"]);
        assert_eq!(snapshot[0], first);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        store.add(movie("m1", "Foo"));
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.remove("nope");
        assert_eq!(ids(&store.snapshot()), vec!["m1"]);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_removal_keeps_order_of_survivors() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        for id in ["a", "b", "c", "d"] {
            store.add(movie(id, id));
        }
        store.remove("b");
        store.add(movie("e", "e"));
        assert_eq!(ids(&store.snapshot()), vec!["a", "c", "d", "e"]);
    }

    #[test]
    fn test_no_duplicates_under_mixed_operations() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        let pool = ["a", "b", "c"];
        // Deterministic pseudo-random walk over adds and removes
        let mut state: u32 = 7;
        for _ in 0..200 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let id = pool[(state >> 16) as usize % pool.len()];
            if (state >> 8) % 3 == 0 {
                store.remove(id);
            } else {
                store.add(movie(id, id));
            }

            let snapshot = store.snapshot();
            let unique: HashSet<_> = snapshot.iter().map(|e| &e.id).collect();
            assert_eq!(unique.len(), snapshot.len());
        }
    }

    #[test]
    fn test_write_through_persists_every_mutation() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = WatchlistStore::initialize(storage.clone(), KEY);

        store.add(movie("m1", "Foo"));
        let blob = storage.get(KEY).unwrap().unwrap();
        let stored: Vec<WatchlistEntry> = serde_json::from_str(&blob).unwrap();
        assert_eq!(ids(&stored), vec!["m1"]);

        store.remove("m1");
        assert_eq!(storage.get(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileKeyValueStore::new(dir.path()));

        let mut detailed = movie("m2", "Bar");
        detailed.original_name = "Bar Original".to_string();
        detailed.slug = "bar".to_string();
        detailed.thumbnail_url = "bar-thumb.jpg".to_string();
        detailed.year = 1999;

        let store = WatchlistStore::initialize(storage.clone(), KEY);
        store.add(movie("m1", "Foo"));
        store.add(detailed);
        store.add(movie("m3", "Baz"));
        let expected = store.snapshot();
        drop(store);

        let reloaded = WatchlistStore::initialize(storage, KEY);
        assert_eq!(reloaded.snapshot(), expected);
    }

    #[test]
    fn test_corrupt_blob_yields_empty() {
        let storage = Arc::new(MemoryKeyValueStore::with_entry(KEY, "not json"));
        let store = WatchlistStore::initialize(storage, KEY);
        assert!(store.is_empty());
        assert_eq!(store.snapshot(), Vec::<WatchlistEntry>::new());
    }

    #[test]
    fn test_missing_key_yields_empty() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_stored_duplicates_are_collapsed() {
        let blob = r#"[{"_id":"m1","name":"First"},{"_id":"m2","name":"Two"},{"_id":"m1","name":"Again"}]"#;
        let storage = Arc::new(MemoryKeyValueStore::with_entry(KEY, blob));
        let store = WatchlistStore::initialize(storage, KEY);
        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["m1", "m2"]);
        assert_eq!(snapshot[0].name, "First");
    }

    #[test]
    fn test_storage_failures_keep_memory_state() {
        let store = WatchlistStore::initialize(Arc::new(FailingStore), KEY);
        assert!(store.is_empty());

        store.add(movie("m1", "Foo"));
        store.add(movie("m2", "Bar"));
        store.remove("m1");

        assert_eq!(ids(&store.snapshot()), vec!["m2"]);
        assert!(store.contains("m2"));
        assert!(!store.contains("m1"));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY);
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        store.add(movie("m1", "Foo"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(ids(&rx.borrow_and_update()), vec!["m1"]);

        store.add(movie("m1", "Foo"));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_concurrent_adds_from_threads() {
        let store = Arc::new(WatchlistStore::initialize(Arc::new(MemoryKeyValueStore::new()), KEY));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        // Every thread adds the same ids, so most adds collide
                        store.add(movie(&format!("m{}", i), &format!("thread {}", t)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 25);
    }
}
