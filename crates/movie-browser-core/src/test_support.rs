use async_trait::async_trait;
use movie_browser_catalog::{CatalogApi, CatalogError};
use movie_browser_models::{MovieDetail, MovieSummary, PagedResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
enum Scripted {
    Items { delay: Duration, items: Vec<MovieSummary> },
    Fail { delay: Duration },
}

/// Catalog double with scripted latencies, recording every call.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    searches: Mutex<HashMap<String, Scripted>>,
    categories: Mutex<HashMap<String, Scripted>>,
    new_releases: Mutex<Option<Scripted>>,
    calls: Mutex<Vec<String>>,
}

pub(crate) fn movies(prefix: &str, count: usize) -> Vec<MovieSummary> {
    (0..count)
        .map(|i| {
            let mut movie =
                MovieSummary::new(format!("{}-{}", prefix, i), format!("{} {}", prefix, i));
            movie.slug = format!("{}-slug-{}", prefix, i);
            movie
        })
        .collect()
}

impl FakeCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, keyword: &str, delay_ms: u64, items: Vec<MovieSummary>) -> Self {
        self.searches.lock().unwrap().insert(
            keyword.to_string(),
            Scripted::Items { delay: Duration::from_millis(delay_ms), items },
        );
        self
    }

    pub(crate) fn fail(self, keyword: &str, delay_ms: u64) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(keyword.to_string(), Scripted::Fail { delay: Duration::from_millis(delay_ms) });
        self
    }

    pub(crate) fn category(self, slug: &str, items: Vec<MovieSummary>) -> Self {
        self.categories
            .lock()
            .unwrap()
            .insert(slug.to_string(), Scripted::Items { delay: Duration::ZERO, items });
        self
    }

    pub(crate) fn new_releases(self, items: Vec<MovieSummary>) -> Self {
        *self.new_releases.lock().unwrap() = Some(Scripted::Items { delay: Duration::ZERO, items });
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Keywords passed to `search`, in call order.
    pub(crate) fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix("search:").map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn play(
        script: Option<Scripted>,
        what: &str,
    ) -> Result<PagedResult<MovieSummary>, CatalogError> {
        match script {
            Some(Scripted::Items { delay, items }) => {
                tokio::time::sleep(delay).await;
                Ok(PagedResult::new(items, None))
            }
            Some(Scripted::Fail { delay }) => {
                tokio::time::sleep(delay).await;
                Err(CatalogError::Status { status: 503, url: what.to_string() })
            }
            None => Err(CatalogError::Status { status: 404, url: what.to_string() }),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    fn catalog_name(&self) -> &str {
        "fake"
    }

    async fn list_new(&self, page: u32) -> Result<PagedResult<MovieSummary>, CatalogError> {
        self.record(format!("new:{}", page));
        let script = self.new_releases.lock().unwrap().clone();
        Self::play(script, "new").await
    }

    async fn get_detail(&self, slug: &str) -> Result<MovieDetail, CatalogError> {
        self.record(format!("detail:{}", slug));
        Err(CatalogError::NotFound(slug.to_string()))
    }

    async fn search(
        &self,
        keyword: &str,
        page: u32,
    ) -> Result<PagedResult<MovieSummary>, CatalogError> {
        self.record(format!("search:{}", keyword));
        assert_eq!(page, 1);
        let script = self
            .searches
            .lock()
            .unwrap()
            .get(keyword)
            .cloned()
            .unwrap_or_else(|| Scripted::Items {
                delay: Duration::ZERO,
                items: movies(keyword, 1),
            });
        Self::play(Some(script), keyword).await
    }

    async fn list_by_category(
        &self,
        category_slug: &str,
        page: u32,
    ) -> Result<PagedResult<MovieSummary>, CatalogError> {
        self.record(format!("category:{}:{}", category_slug, page));
        let script = self.categories.lock().unwrap().get(category_slug).cloned();
        Self::play(script, category_slug).await
    }
}
