use crate::error::CatalogError;
use crate::images::ImageResolver;
use crate::ophim::api;
use crate::traits::CatalogApi;
use async_trait::async_trait;
use movie_browser_config::CatalogConfig;
use movie_browser_models::{MovieDetail, MovieSummary, PagedResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("reelscout/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the ophim movie catalog.
#[derive(Clone)]
pub struct OphimClient {
    client: Arc<Client>,
    base_url: String,
    images: ImageResolver,
}

fn create_ophim_client(timeout: Duration) -> Result<Client, CatalogError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

impl OphimClient {
    pub fn new(base_url: &str, image_cdn: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CatalogError::InvalidBaseUrl(base_url));
        }

        info!("Using movie catalog at {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            client: Arc::new(create_ophim_client(timeout)?),
            base_url,
            images: ImageResolver::new(image_cdn),
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(&config.base_url, &config.image_cdn, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn images(&self) -> &ImageResolver {
        &self.images
    }
}

#[async_trait]
impl CatalogApi for OphimClient {
    fn catalog_name(&self) -> &str {
        "ophim"
    }

    async fn list_new(&self, page: u32) -> Result<PagedResult<MovieSummary>, CatalogError> {
        let result = api::list_new(&self.client, &self.base_url, page).await?;
        debug!("Fetched {} new releases (page {})", result.items.len(), page);
        Ok(result)
    }

    async fn get_detail(&self, slug: &str) -> Result<MovieDetail, CatalogError> {
        api::get_detail(&self.client, &self.base_url, slug).await
    }

    async fn search(
        &self,
        keyword: &str,
        page: u32,
    ) -> Result<PagedResult<MovieSummary>, CatalogError> {
        let result = api::search(&self.client, &self.base_url, keyword, page).await?;
        debug!("Search {:?} page {} returned {} items", keyword, page, result.items.len());
        Ok(result)
    }

    async fn list_by_category(
        &self,
        category_slug: &str,
        page: u32,
    ) -> Result<PagedResult<MovieSummary>, CatalogError> {
        let result =
            api::list_by_category(&self.client, &self.base_url, category_slug, page).await?;
        debug!(
            "Fetched {} items for category {} (page {})",
            result.items.len(),
            category_slug,
            page
        );
        Ok(result)
    }
}
