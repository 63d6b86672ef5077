//! Per-currency item catalog projection
//!
//! Owns the full item list as last fetched, the active search filter, and
//! the page cursor. Everything shown is derived from those three; the
//! filtered list is never stored.

use serde::Serialize;
use webshop_core::{CatalogItem, Currency};

/// Pagination summary for one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// One currency's catalog with filtering and paging
#[derive(Debug)]
pub struct CatalogProjection {
    currency: Currency,
    items: Vec<CatalogItem>,
    /// Lowercased active query; empty means no filter
    filter: String,
    /// 1-based, always within [1, total_pages]
    page: usize,
    page_size: usize,
    version: u64,
}

impl CatalogProjection {
    pub fn new(currency: Currency, page_size: usize) -> Self {
        Self {
            currency,
            items: Vec::new(),
            filter: String::new(),
            page: 1,
            page_size: page_size.max(1),
            version: 0,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Replace the whole list from a fresh fetch. Resets to page 1; an
    /// in-progress search stays active.
    pub fn replace_all(&mut self, items: Vec<CatalogItem>) {
        self.items = items;
        self.page = 1;
        self.clamp_page();
        self.version += 1;
    }

    /// Case-insensitive substring filter on the item name
    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.trim().to_lowercase();
        self.page = 1;
        self.clamp_page();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// At least 1 even when nothing matches the filter
    pub fn total_pages(&self) -> usize {
        self.filtered().count().div_ceil(self.page_size).max(1)
    }

    /// The current page of the filtered list, order preserved
    pub fn visible_page(&self) -> Vec<CatalogItem> {
        self.filtered()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect()
    }

    pub fn page_view(&self) -> PageView {
        let total_pages = self.total_pages();
        PageView {
            page: self.page,
            total_pages,
            has_prev: self.page > 1,
            has_next: self.page < total_pages,
        }
    }

    /// Look up an item by id in the full, unfiltered list
    pub fn find(&self, item_id: i64) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Counts list replacements; the scheduler compares it around a fetch
    /// to spot results that went stale in flight
    pub fn version(&self) -> u64 {
        self.version
    }

    fn filtered(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.items
            .iter()
            .filter(move |i| self.filter.is_empty() || i.name.to_lowercase().contains(&self.filter))
    }

    fn clamp_page(&mut self) {
        let total_pages = self.total_pages();
        if self.page > total_pages {
            self.page = total_pages;
        }
        if self.page < 1 {
            self.page = 1;
        }
    }
}
