use movie_browser_catalog::{CatalogApi, CatalogError};
use movie_browser_models::MovieSummary;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

pub const SIMILAR_MOVIES_LIMIT: usize = 6;
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Movies related to `current_id`, taken from its category.
///
/// Falls back to new releases when the category listing fails. Only errors
/// when both listings fail.
pub async fn similar_movies(
    catalog: &dyn CatalogApi,
    category_slug: &str,
    current_id: &str,
    limit: usize,
) -> Result<Vec<MovieSummary>, CatalogError> {
    let page = match catalog.list_by_category(category_slug, 1).await {
        Ok(page) => page,
        Err(e) => {
            warn!(
                "Failed to list category {} for similar movies: {}. Falling back to new releases.",
                category_slug, e
            );
            catalog.list_new(1).await?
        }
    };

    let similar: Vec<MovieSummary> = page
        .items
        .into_iter()
        .filter(|movie| movie.id != current_id)
        .take(limit)
        .collect();
    debug!("Found {} similar movies for {}", similar.len(), current_id);
    Ok(similar)
}

/// Page numbers to show around `current`, at most `max_visible` of them.
///
/// Empty when there is only one page.
pub fn page_window(current: u32, total: u32, max_visible: u32) -> RangeInclusive<u32> {
    if total <= 1 || max_visible == 0 {
        return RangeInclusive::new(1, 0);
    }

    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total);
    if end - start + 1 < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }
    start..=end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{movies, FakeCatalog};

    #[tokio::test]
    async fn test_similar_excludes_current_and_limits() {
        let catalog = FakeCatalog::new().category("hanh-dong", movies("a", 10));
        let similar = similar_movies(&catalog, "hanh-dong", "a-2", SIMILAR_MOVIES_LIMIT)
            .await
            .unwrap();

        let ids: Vec<_> = similar.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a-0", "a-1", "a-3", "a-4", "a-5", "a-6"]);
        assert_eq!(catalog.calls(), vec!["category:hanh-dong:1"]);
    }

    #[tokio::test]
    async fn test_similar_falls_back_to_new_releases() {
        let catalog = FakeCatalog::new().new_releases(movies("new", 3));
        let similar = similar_movies(&catalog, "missing", "new-0", SIMILAR_MOVIES_LIMIT)
            .await
            .unwrap();

        let ids: Vec<_> = similar.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["new-1", "new-2"]);
        assert_eq!(catalog.calls(), vec!["category:missing:1", "new:1"]);
    }

    #[tokio::test]
    async fn test_similar_fails_when_both_listings_fail() {
        let catalog = FakeCatalog::new();
        let result = similar_movies(&catalog, "missing", "x", SIMILAR_MOVIES_LIMIT).await;
        assert!(result.is_err());
    }

    fn window(current: u32, total: u32) -> Vec<u32> {
        page_window(current, total, MAX_VISIBLE_PAGES).collect()
    }

    #[test]
    fn test_page_window() {
        assert!(window(1, 1).is_empty());
        assert!(window(1, 0).is_empty());
        assert_eq!(window(1, 3), vec![1, 2, 3]);
        assert_eq!(window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(window(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(window(9, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(window(42, 10), vec![6, 7, 8, 9, 10]);
    }
}
