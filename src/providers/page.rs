use serde::Serialize;
use serde_json::Value;

use super::CollectionProvider;

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Value>,
    pub meta: PageMeta,
}

/// Pagination metadata for a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u32,
    pub total_entries: u64,
    pub total_pages: u64,
    pub previous_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl PageMeta {
    /// Derive the page counts and neighbours from the totals
    ///
    /// `per_page` must be at least 1.
    pub fn new(current_page: u64, per_page: u32, total_entries: u64) -> Self {
        let total_pages = total_entries.div_ceil(u64::from(per_page.max(1)));

        Self {
            current_page,
            per_page,
            total_entries,
            total_pages,
            previous_page: (current_page > 1).then(|| current_page - 1),
            next_page: (current_page < total_pages).then(|| current_page + 1),
        }
    }
}

/// In-memory paginator that slices an already loaded collection
#[derive(Debug, Clone, Copy, Default)]
pub struct SlicePaginator;

impl CollectionProvider for SlicePaginator {
    fn paginate(&self, items: Vec<Value>, page: u64, per_page: u32) -> Page {
        let total_entries = items.len() as u64;
        let per_page = per_page.max(1);
        let offset = page.saturating_sub(1).saturating_mul(u64::from(per_page));

        // An offset past the end yields an empty page
        let items = match usize::try_from(offset) {
            Ok(skip) => items.into_iter().skip(skip).take(per_page as usize).collect(),
            Err(_) => Vec::new(),
        };

        Page {
            items,
            meta: PageMeta::new(page, per_page, total_entries),
        }
    }
}
