//! Persisted collection layout and derived counters.

use serde::{Deserialize, Serialize};

use super::{Item, ItemStatus};

/// Current layout version of the stored collection.
pub const SCHEMA_VERSION: u32 = 1;

/// The stored form of the whole item collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCollection {
    pub schema_version: u32,
    pub items: Vec<Item>,
}

/// Any collection layout `load` understands.
///
/// Older pages wrote the item array directly under the storage key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredPayload {
    Versioned(StoredCollection),
    Legacy(Vec<Item>),
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}

/// Headline counters shown above the listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub claimed: usize,
}

impl Stats {
    pub fn from_items(items: &[Item]) -> Self {
        let count = |status: ItemStatus| items.iter().filter(|i| i.status == status).count();
        Self {
            total: items.len(),
            pending: count(ItemStatus::Pending),
            claimed: count(ItemStatus::Claimed),
        }
    }
}
