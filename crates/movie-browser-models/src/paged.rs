use serde::{Deserialize, Serialize};

/// Pagination metadata as reported by the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Pagination {
    #[serde(rename = "totalItems", default)]
    pub total_items: u64,
    #[serde(rename = "totalItemsPerPage", default)]
    pub items_per_page: u64,
    #[serde(rename = "currentPage", default)]
    pub current_page: u32,
}

impl Pagination {
    pub fn total_pages(&self) -> u32 {
        if self.total_items == 0 || self.items_per_page == 0 {
            return 1;
        }
        let pages = self.total_items.div_ceil(self.items_per_page);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, pagination: Option<Pagination>) -> Self {
        Self { items, pagination }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
        }
    }

    /// Number of pages; 1 when the catalog sent no usable metadata.
    pub fn total_pages(&self) -> u32 {
        self.pagination.map(|p| p.total_pages()).unwrap_or(1)
    }

    pub fn current_page(&self) -> u32 {
        self.pagination
            .map(|p| p.current_page)
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(total_items: u64, items_per_page: u64) -> Pagination {
        Pagination {
            total_items,
            items_per_page,
            current_page: 1,
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(pagination(100, 24).total_pages(), 5);
        assert_eq!(pagination(96, 24).total_pages(), 4);
        assert_eq!(pagination(1, 24).total_pages(), 1);
    }

    #[test]
    fn test_total_pages_fallbacks() {
        assert_eq!(pagination(0, 24).total_pages(), 1);
        assert_eq!(pagination(50, 0).total_pages(), 1);

        let page: PagedResult<u8> = PagedResult::new(vec![1, 2], None);
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.current_page(), 1);
    }
}
