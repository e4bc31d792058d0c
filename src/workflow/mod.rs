//! Admin workflow: status transitions and removal.
//!
//! Every applied change is written to storage before the call returns. If
//! the write fails the in-memory change is undone so the store never runs
//! ahead of what is persisted.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Item, ItemStatus};
use crate::store::ItemStore;

/// Result of an admin action on one item.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransitionOutcome {
    /// The change was made and persisted.
    Applied,
    /// The item is not in the state the action starts from; nothing changed.
    Unchanged,
    /// No item has that id; nothing changed.
    NotFound,
}

/// Outcome of an admin action plus the storage revision it left behind.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub id: String,
    pub outcome: TransitionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<i64>,
}

/// Items grouped the way the admin view lists them.
#[derive(Debug, Serialize)]
pub struct AdminLists<'a> {
    pub pending: Vec<&'a Item>,
    pub approved: Vec<&'a Item>,
    pub claimed: Vec<&'a Item>,
}

/// Group items by status, each list in store order.
pub fn admin_lists(items: &[Item]) -> AdminLists<'_> {
    let with_status =
        |status: ItemStatus| items.iter().filter(|i| i.status == status).collect::<Vec<_>>();
    AdminLists {
        pending: with_status(ItemStatus::Pending),
        approved: with_status(ItemStatus::Approved),
        claimed: with_status(ItemStatus::Claimed),
    }
}

/// Pending -> approved.
pub async fn approve(store: &mut ItemStore, id: &str) -> Result<ActionReport, AppError> {
    advance(store, id, ItemStatus::Pending).await
}

/// Approved -> claimed.
pub async fn mark_claimed(store: &mut ItemStore, id: &str) -> Result<ActionReport, AppError> {
    advance(store, id, ItemStatus::Approved).await
}

/// Delete an item from any state. Every record sharing the id goes.
pub async fn remove(store: &mut ItemStore, id: &str) -> Result<ActionReport, AppError> {
    let taken = store.take(id);
    if taken.is_empty() {
        tracing::debug!(id, "Remove ignored, no such item");
        return Ok(report(id, TransitionOutcome::NotFound, None, None));
    }

    match store.save().await {
        Ok(revision_id) => {
            tracing::info!(id, count = taken.len(), "Item removed");
            Ok(report(id, TransitionOutcome::Applied, None, Some(revision_id)))
        }
        Err(e) => {
            store.restore(taken);
            Err(e)
        }
    }
}

async fn advance(
    store: &mut ItemStore,
    id: &str,
    from: ItemStatus,
) -> Result<ActionReport, AppError> {
    let Some(item) = store.get_mut(id) else {
        tracing::debug!(id, "Transition ignored, no such item");
        return Ok(report(id, TransitionOutcome::NotFound, None, None));
    };

    let current = item.status;
    let next = match current.next() {
        Some(next) if current == from => next,
        _ => {
            tracing::debug!(id, status = current.as_str(), "Transition ignored, wrong state");
            return Ok(report(id, TransitionOutcome::Unchanged, Some(current), None));
        }
    };
    item.status = next;

    match store.save().await {
        Ok(revision_id) => {
            tracing::info!(id, from = current.as_str(), to = next.as_str(), "Item status changed");
            Ok(report(id, TransitionOutcome::Applied, Some(next), Some(revision_id)))
        }
        Err(e) => {
            if let Some(item) = store.get_mut(id) {
                item.status = current;
            }
            Err(e)
        }
    }
}

fn report(
    id: &str,
    outcome: TransitionOutcome,
    status: Option<ItemStatus>,
    revision_id: Option<i64>,
) -> ActionReport {
    ActionReport {
        id: id.to_string(),
        outcome,
        status,
        revision_id,
    }
}
