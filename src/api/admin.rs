//! Admin endpoints.
//!
//! Everything except `unlock` sits behind [`crate::auth::admin_gate_layer`].

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::auth::{key_matches, INCORRECT_KEY_MESSAGE, UNLOCKED_MESSAGE};
use crate::errors::AppError;
use crate::models::Item;
use crate::workflow::{self, ActionReport, AdminLists};
use crate::AppState;

/// Request body for unlocking the admin view.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
    pub message: String,
}

/// Admin lists as sent to the page.
#[derive(Debug, Serialize)]
pub struct AdminListsResponse {
    pub pending: Vec<Item>,
    pub approved: Vec<Item>,
    pub claimed: Vec<Item>,
}

impl From<AdminLists<'_>> for AdminListsResponse {
    fn from(lists: AdminLists<'_>) -> Self {
        fn owned(items: Vec<&Item>) -> Vec<Item> {
            items.into_iter().cloned().collect()
        }
        Self {
            pending: owned(lists.pending),
            approved: owned(lists.approved),
            claimed: owned(lists.claimed),
        }
    }
}

/// Query parameters for removal.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveParams {
    /// Removal is irreversible and must be confirmed explicitly.
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/admin/unlock - Check the admin key.
pub async fn unlock_admin(
    State(state): State<AppState>,
    Json(request): Json<UnlockRequest>,
) -> ApiResult<UnlockResponse> {
    let revision_id = state.store.lock().await.revision_id().await.unwrap_or(0);

    if !key_matches(&request.key, &state.config.admin_key) {
        tracing::warn!("Admin unlock rejected");
        return error(
            AppError::Unauthorized(INCORRECT_KEY_MESSAGE.to_string()),
            revision_id,
        );
    }

    tracing::info!("Admin controls unlocked");
    success(
        UnlockResponse {
            unlocked: true,
            message: UNLOCKED_MESSAGE.to_string(),
        },
        revision_id,
    )
}

/// GET /api/admin/items - Items grouped by status.
pub async fn list_admin_items(State(state): State<AppState>) -> ApiResult<AdminListsResponse> {
    let store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    success(
        AdminListsResponse::from(workflow::admin_lists(store.items())),
        revision_id,
    )
}

/// POST /api/admin/items/:id/approve - Approve a pending item.
pub async fn approve_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ActionReport> {
    let mut store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    match workflow::approve(&mut store, &id).await {
        Ok(report) => {
            let new_revision = report.revision_id.unwrap_or(revision_id);
            success(report, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/items/:id/claim - Mark an approved item as claimed.
pub async fn mark_item_claimed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ActionReport> {
    let mut store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    match workflow::mark_claimed(&mut store, &id).await {
        Ok(report) => {
            let new_revision = report.revision_id.unwrap_or(revision_id);
            success(report, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/items/:id?confirm=true - Remove an item.
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RemoveParams>,
) -> ApiResult<ActionReport> {
    let mut store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    if !params.confirm {
        return error(
            AppError::Validation("Removal must be confirmed with confirm=true".to_string()),
            revision_id,
        );
    }

    match workflow::remove(&mut store, &id).await {
        Ok(report) => {
            let new_revision = report.revision_id.unwrap_or(revision_id);
            success(report, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
