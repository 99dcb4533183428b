use crate::error::CatalogError;
use async_trait::async_trait;
use movie_browser_models::{MovieDetail, MovieSummary, PagedResult};

/// Read-only movie catalog. Pages are 1-based.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Short name used in logs.
    fn catalog_name(&self) -> &str;

    async fn list_new(&self, page: u32) -> Result<PagedResult<MovieSummary>, CatalogError>;

    /// Full record for one movie. `CatalogError::NotFound` when the catalog has no such slug.
    async fn get_detail(&self, slug: &str) -> Result<MovieDetail, CatalogError>;

    async fn search(
        &self,
        keyword: &str,
        page: u32,
    ) -> Result<PagedResult<MovieSummary>, CatalogError>;

    async fn list_by_category(
        &self,
        category_slug: &str,
        page: u32,
    ) -> Result<PagedResult<MovieSummary>, CatalogError>;
}
