use crate::paged::{PagedResult, Pagination};
use serde::Deserialize;

/// Response wrapper used by every catalog endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    pub data: Option<ApiData<T>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiData<T> {
    pub items: Option<Vec<T>>,
    pub item: Option<T>,
    #[serde(default)]
    pub params: Option<ApiParams>,
}

#[derive(Debug, Deserialize)]
pub struct ApiParams {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> ApiEnvelope<T> {
    /// Listing view of the envelope. Missing `items` is an empty page.
    pub fn into_page(self) -> PagedResult<T> {
        match self.data {
            Some(data) => PagedResult::new(
                data.items.unwrap_or_default(),
                data.params.and_then(|p| p.pagination),
            ),
            None => PagedResult::empty(),
        }
    }

    /// Single-item view of the envelope, used by detail lookups.
    pub fn into_item(self) -> Option<T> {
        self.data.and_then(|data| data.item)
    }
}
