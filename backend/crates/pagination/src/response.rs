//! Page metadata and the paginated response envelope.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// Totals describing where a page sits in the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Number of matching rows across all pages.
    pub total: u64,
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// `ceil(total / limit)`.
    pub total_pages: u64,
    /// `page < total_pages`.
    pub has_next: bool,
    /// `page > 1`.
    pub has_prev: bool,
}

impl PageMeta {
    /// Compute metadata for `request` against `total` matching rows.
    #[must_use]
    pub fn new(total: u64, request: &PageRequest) -> Self {
        let total_pages = total.div_ceil(u64::from(request.limit()));
        Self {
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages,
            has_next: u64::from(request.page()) < total_pages,
            has_prev: request.page() > 1,
        }
    }
}

/// One page of items plus its metadata.
///
/// Serialises as `{items, total, page, limit, totalPages, hasNext, hasPrev}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items on this page; empty when the page is out of range.
    pub items: Vec<T>,
    /// Totals for the full result set.
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap an already windowed `items` vector.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            meta: PageMeta::new(total, request),
        }
    }

    /// Window a fully materialised, already ordered result set.
    #[must_use]
    pub fn from_slice_window(all: Vec<T>, request: &PageRequest) -> Self {
        let total = u64::try_from(all.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(take).collect();
        Self::new(items, total, request)
    }

    /// Transform every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// Split into items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        (self.items, self.meta)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn zero_total_has_no_pages() {
        let meta = PageMeta::new(0, &PageRequest::default());
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[rstest]
    fn serialises_flat_envelope() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let page = Paginated::new(vec!["c", "d"], 5, &request);
        let value = serde_json::to_value(&page).expect("serialise");
        assert_eq!(
            value,
            json!({
                "items": ["c", "d"],
                "total": 5,
                "page": 2,
                "limit": 2,
                "totalPages": 3,
                "hasNext": true,
                "hasPrev": true,
            })
        );
    }

    #[rstest]
    fn map_preserves_meta() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let page = Paginated::from_slice_window(vec![1, 2, 3], &request).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.meta.total, 3);
    }
}
