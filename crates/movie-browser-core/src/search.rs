//! Search-as-you-type against the movie catalog.
//!
//! Keystrokes are debounced (trailing edge), short queries never reach the
//! catalog, and every dispatch is tagged with a sequence number so that only
//! the response to the most recent dispatch can update the visible results.
//! Superseded responses are dropped when they arrive; the underlying request
//! is not cancelled.

use crate::debounce::Debouncer;
use movie_browser_catalog::{CatalogApi, CatalogError};
use movie_browser_config::{CatalogConfig, SearchConfig};
use movie_browser_models::{MovieSummary, PagedResult};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::error::Elapsed;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
    pub max_results: usize,
    pub request_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_chars: 2,
            max_results: 8,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SearchSettings {
    pub fn from_config(search: &SearchConfig, catalog: &CatalogConfig) -> Self {
        Self {
            debounce: search.debounce(),
            min_query_chars: search.min_query_chars,
            max_results: search.max_results,
            request_timeout: catalog.timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Query empty or too short.
    #[default]
    Idle,
    /// Debounce timer running.
    Pending,
    /// Request in flight.
    Loading,
    /// Results available and visible.
    Shown,
    /// Dropdown dismissed, results retained.
    Hidden,
}

/// What the presentation layer renders for the live search box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<MovieSummary>,
    pub is_loading: bool,
    pub is_visible: bool,
    pub phase: SearchPhase,
}

struct Bookkeeping {
    query: String,
    /// Bumped on every edit; a fired timer only dispatches if it still matches.
    input_generation: u64,
    /// Generation whose debounce timer has not fired yet.
    pending_generation: Option<u64>,
    /// Sequence number of the most recent dispatch (or invalidation).
    latest_dispatch: u64,
    debouncer: Debouncer,
    in_flight: Vec<JoinHandle<()>>,
    closed: bool,
}

impl Bookkeeping {
    fn cancel_pending(&mut self) {
        self.debouncer.cancel();
        self.pending_generation = None;
    }

    /// Make any response still in flight stale.
    fn invalidate_in_flight(&mut self) {
        self.latest_dispatch += 1;
    }
}

struct Shared {
    catalog: Arc<dyn CatalogApi>,
    settings: SearchSettings,
    book: Mutex<Bookkeeping>,
    state: watch::Sender<SearchState>,
}

/// Drives one live search box. Must be used inside a Tokio runtime.
pub struct SearchController {
    shared: Arc<Shared>,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn CatalogApi>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            shared: Arc::new(Shared {
                catalog,
                settings,
                book: Mutex::new(Bookkeeping {
                    query: String::new(),
                    input_generation: 0,
                    pending_generation: None,
                    latest_dispatch: 0,
                    debouncer: Debouncer::new(),
                    in_flight: Vec::new(),
                    closed: false,
                }),
                state,
            }),
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.shared.settings
    }

    /// Current state snapshot.
    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    pub fn query(&self) -> String {
        self.shared.lock().query.clone()
    }

    /// Handle one edit of the search box; `raw` is the full query text.
    pub fn input(&self, raw: &str) {
        let shared = &self.shared;
        let mut book = shared.lock();
        if book.closed {
            return;
        }

        book.query = raw.to_string();
        book.input_generation += 1;
        book.cancel_pending();

        let keyword = raw.trim();
        if keyword.chars().count() < shared.settings.min_query_chars {
            book.invalidate_in_flight();
            shared.state.send_modify(|state| {
                state.query = raw.to_string();
                state.results.clear();
                state.is_loading = false;
                state.is_visible = false;
                state.phase = SearchPhase::Idle;
            });
            return;
        }

        let generation = book.input_generation;
        let keyword = keyword.to_string();
        let dispatcher = Arc::clone(shared);
        book.pending_generation = Some(generation);
        book.debouncer.schedule(shared.settings.debounce, async move {
            dispatcher.dispatch(generation, keyword);
        });

        shared.state.send_modify(|state| {
            state.query = raw.to_string();
            state.phase = SearchPhase::Pending;
        });
    }

    /// Hide the dropdown, keeping results for when it reopens.
    pub fn dismiss(&self) {
        let _book = self.shared.lock();
        self.shared.state.send_modify(|state| {
            state.is_visible = false;
            if state.phase != SearchPhase::Idle {
                state.phase = SearchPhase::Hidden;
            }
        });
    }

    /// Reopen the dropdown without refetching, if the query is long enough.
    ///
    /// Stays hidden when there is nothing to show: no results and no lookup
    /// running or scheduled.
    pub fn focus(&self) {
        let book = self.shared.lock();
        if book.query.trim().chars().count() < self.shared.settings.min_query_chars {
            return;
        }
        let pending = book.pending_generation.is_some();
        let empty = {
            let state = self.shared.state.borrow();
            state.results.is_empty() && !state.is_loading
        };
        if empty && !pending {
            return;
        }
        self.shared.state.send_modify(|state| {
            state.is_visible = true;
            state.phase = if pending {
                SearchPhase::Pending
            } else if state.is_loading {
                SearchPhase::Loading
            } else {
                SearchPhase::Shown
            };
        });
    }

    /// The user picked `movie`; clears the box and hands the movie back for navigation.
    pub fn select(&self, movie: MovieSummary) -> MovieSummary {
        debug!("Selected {} from live search", movie.slug);
        self.reset();
        movie
    }

    /// Submit the box as a full search. Returns the trimmed query, or `None` if blank.
    pub fn submit(&self) -> Option<String> {
        let keyword = self.shared.lock().query.trim().to_string();
        if keyword.is_empty() {
            return None;
        }
        self.reset();
        Some(keyword)
    }

    /// Cancel the timer and abandon in-flight requests. Further input is ignored.
    pub fn shutdown(&self) {
        let mut book = self.shared.lock();
        if book.closed {
            return;
        }
        book.closed = true;
        book.cancel_pending();
        book.invalidate_in_flight();
        for task in book.in_flight.drain(..) {
            task.abort();
        }
        debug!("Search controller shut down");
    }

    fn reset(&self) {
        let mut book = self.shared.lock();
        book.query.clear();
        book.input_generation += 1;
        book.cancel_pending();
        book.invalidate_in_flight();
        self.shared.state.send_modify(|state| {
            state.query.clear();
            state.results.clear();
            state.is_loading = false;
            state.is_visible = false;
            state.phase = SearchPhase::Idle;
        });
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

type SearchOutcome = Result<Result<PagedResult<MovieSummary>, CatalogError>, Elapsed>;

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Bookkeeping> {
        self.book.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Debounce timer fired for `generation`.
    fn dispatch(self: &Arc<Self>, generation: u64, keyword: String) {
        let mut book = self.lock();
        if book.closed || book.pending_generation != Some(generation) {
            return;
        }
        book.pending_generation = None;
        book.latest_dispatch += 1;
        let sequence = book.latest_dispatch;
        debug!("Dispatching live search #{} for {:?}", sequence, keyword);

        self.state.send_modify(|state| {
            state.is_loading = true;
            state.phase = SearchPhase::Loading;
        });

        let shared = Arc::clone(self);
        let timeout = self.settings.request_timeout;
        let task = tokio::spawn(async move {
            let outcome = tokio::time::timeout(timeout, shared.catalog.search(&keyword, 1)).await;
            shared.complete(sequence, &keyword, outcome);
        });
        book.in_flight.retain(|task| !task.is_finished());
        book.in_flight.push(task);
    }

    fn complete(&self, sequence: u64, keyword: &str, outcome: SearchOutcome) {
        let book = self.lock();
        if sequence != book.latest_dispatch {
            debug!(
                "Discarding stale results for {:?} (#{}, latest #{})",
                keyword, sequence, book.latest_dispatch
            );
            return;
        }
        let pending = book.pending_generation.is_some();

        match outcome {
            Ok(Ok(page)) => {
                let results: Vec<MovieSummary> =
                    page.items.into_iter().take(self.settings.max_results).collect();
                debug!("Live search {:?} returned {} results", keyword, results.len());
                self.state.send_modify(|state| {
                    state.results = results;
                    state.is_loading = false;
                    state.is_visible = true;
                    state.phase = if pending { SearchPhase::Pending } else { SearchPhase::Shown };
                });
            }
            Ok(Err(e)) => {
                warn!("Live search for {:?} failed: {}", keyword, e);
                self.fail(pending);
            }
            Err(_) => {
                warn!(
                    "Live search for {:?} timed out after {:?}",
                    keyword, self.settings.request_timeout
                );
                self.fail(pending);
            }
        }
    }

    /// Previous results stay on screen after a failed lookup.
    fn fail(&self, pending: bool) {
        self.state.send_modify(|state| {
            state.is_loading = false;
            state.phase = if pending {
                SearchPhase::Pending
            } else if state.is_visible {
                SearchPhase::Shown
            } else {
                SearchPhase::Hidden
            };
        });
    }
}
