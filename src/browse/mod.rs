//! Browse engine: filter and order the public listing.
//!
//! Stateless; every call recomputes the view from the full collection.

use serde::{Deserialize, Serialize};

use crate::models::{Item, ItemStatus};

/// Which statuses the listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    /// Hide pending and claimed items.
    Approved,
}

impl StatusFilter {
    /// `"approved"` selects approved items; any other value shows everything.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "approved" => StatusFilter::Approved,
            _ => StatusFilter::All,
        }
    }

    fn admits(&self, item: &Item) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Approved => {
                item.status != ItemStatus::Pending && item.status != ItemStatus::Claimed
            }
        }
    }
}

/// Ordering by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
}

impl SortMode {
    /// `"oldest"` sorts ascending; any other value sorts newest first.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "oldest" => SortMode::Oldest,
            _ => SortMode::Newest,
        }
    }
}

/// Raw browse parameters as they arrive from the listing controls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub sort: String,
}

/// Parsed browse configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Lowercased, trimmed search text; empty means no text filter.
    pub query: String,
    /// Exact category; empty means any category.
    pub category: String,
    pub status: StatusFilter,
    pub sort: SortMode,
}

impl From<&BrowseQuery> for BrowseConfig {
    fn from(raw: &BrowseQuery) -> Self {
        Self {
            query: raw.q.trim().to_lowercase(),
            category: raw.category.clone(),
            status: StatusFilter::parse(&raw.status),
            sort: SortMode::parse(&raw.sort),
        }
    }
}

impl BrowseConfig {
    fn matches_category(&self, item: &Item) -> bool {
        self.category.is_empty() || item.category == self.category
    }

    fn matches_query(&self, item: &Item) -> bool {
        if self.query.is_empty() {
            return true;
        }
        [&item.title, &item.description, &item.location, &item.id]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.query))
    }

    fn admits(&self, item: &Item) -> bool {
        self.status.admits(item) && self.matches_category(item) && self.matches_query(item)
    }
}

/// Visible items for one browse configuration.
///
/// `empty` is set when nothing matched so the page can show its placeholder.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseView<'a> {
    pub items: Vec<&'a Item>,
    pub total: usize,
    pub empty: bool,
}

impl BrowseView<'_> {
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

/// Filter `items` by status, category and text, then order by creation time.
///
/// The sort is stable, so items created in the same millisecond keep their
/// store order.
pub fn browse<'a>(items: &'a [Item], config: &BrowseConfig) -> BrowseView<'a> {
    let mut visible: Vec<&Item> = items.iter().filter(|item| config.admits(item)).collect();

    match config.sort {
        SortMode::Oldest => visible.sort_by_key(|item| item.created_at),
        SortMode::Newest => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let total = visible.len();
    BrowseView {
        items: visible,
        total,
        empty: total == 0,
    }
}
