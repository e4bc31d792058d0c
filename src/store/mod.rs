//! Item store: the single owner of all found-item reports.
//!
//! The whole collection is read once at startup and written back in full
//! after every mutation. Mutating methods never persist on their own; call
//! [`ItemStore::save`] right after them.

mod ids;

use std::collections::HashSet;

use chrono::Utc;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{
    Item, ItemStatus, NewItem, Stats, StoredCollection, StoredPayload, SCHEMA_VERSION,
};

/// Authoritative in-memory item collection mirrored to one storage key.
pub struct ItemStore {
    repo: Repository,
    key: String,
    items: Vec<Item>,
}

impl ItemStore {
    /// Create an empty store. Call [`ItemStore::load`] before serving reads.
    pub fn new(repo: Repository, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
            items: Vec::new(),
        }
    }

    /// Replace the in-memory collection with the stored one.
    ///
    /// A missing, unreadable or unparsable value leaves the store empty.
    pub async fn load(&mut self) {
        let raw = match self.repo.get_value(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!(key = %self.key, "No stored items, starting empty");
                self.items = Vec::new();
                return;
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read stored items, starting empty: {}", e);
                self.items = Vec::new();
                return;
            }
        };

        self.items = match serde_json::from_str::<StoredPayload>(&raw) {
            Ok(StoredPayload::Versioned(stored)) if stored.schema_version == SCHEMA_VERSION => {
                stored.items
            }
            Ok(StoredPayload::Versioned(stored)) => {
                tracing::warn!(
                    key = %self.key,
                    schema_version = stored.schema_version,
                    "Unsupported stored schema version, starting empty"
                );
                Vec::new()
            }
            Ok(StoredPayload::Legacy(items)) => {
                tracing::info!(key = %self.key, "Loaded unversioned item collection");
                items
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "Stored items are corrupt, starting empty: {}", e);
                Vec::new()
            }
        };

        tracing::info!("Loaded {} items", self.len());
    }

    /// Write the full collection, replacing the stored value.
    ///
    /// Returns the storage revision after the write.
    pub async fn save(&self) -> Result<i64, AppError> {
        let stored = StoredCollection {
            schema_version: SCHEMA_VERSION,
            items: self.items.clone(),
        };
        let raw = serde_json::to_string(&stored)
            .map_err(|e| AppError::Internal(format!("Failed to serialize items: {}", e)))?;

        let revision_id = self.repo.put_value(&self.key, &raw).await?;
        tracing::debug!(revision_id, items = self.items.len(), "Saved items");
        Ok(revision_id)
    }

    /// Append a new pending item with a fresh id and timestamp.
    pub fn create(&mut self, fields: NewItem) -> Result<Item, AppError> {
        let id = {
            let taken: HashSet<&str> = self.items.iter().map(|i| i.id.as_str()).collect();
            ids::generate_item_id(&mut rand::thread_rng(), &taken)
                .ok_or_else(|| AppError::Internal("Item id space exhausted".to_string()))?
        };

        // Never earlier than anything already stored, so ordering survives clock steps.
        let latest = self.items.iter().map(|i| i.created_at).max().unwrap_or(0);
        let created_at = Utc::now().timestamp_millis().max(latest);

        let item = Item {
            id,
            title: fields.title,
            category: fields.category,
            location: fields.location,
            date: fields.date,
            description: fields.description,
            finder_name: fields.finder_name,
            finder_contact: fields.finder_contact,
            photo_data_url: fields.photo_data_url,
            status: ItemStatus::Pending,
            created_at,
        };

        self.items.push(item.clone());
        Ok(item)
    }

    /// Remove every item with `id` and return them. Unknown ids are ignored.
    ///
    /// Collections written before ids were collision-checked may hold the
    /// same id more than once; all copies go.
    pub fn remove(&mut self, id: &str) -> Vec<Item> {
        self.take(id).into_iter().map(|(_, item)| item).collect()
    }

    /// Remove every item with `id`, reporting where each one sat.
    pub(crate) fn take(&mut self, id: &str) -> Vec<(usize, Item)> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .enumerate()
            .partition(|(_, item)| item.id == id);
        self.items = kept.into_iter().map(|(_, item)| item).collect();
        taken
    }

    /// Put back items previously returned by [`ItemStore::take`].
    pub(crate) fn restore(&mut self, taken: Vec<(usize, Item)>) {
        // ascending original positions rebuild the old order
        for (index, item) in taken {
            let index = index.min(self.items.len());
            self.items.insert(index, item);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn stats(&self) -> Stats {
        Stats::from_items(&self.items)
    }

    /// Revision of the underlying storage.
    pub async fn revision_id(&self) -> Result<i64, AppError> {
        self.repo.get_revision_id().await
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}
