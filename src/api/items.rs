//! Public listing and found-item submission endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::browse::{browse, BrowseConfig, BrowseQuery, BrowseView};
use crate::errors::AppError;
use crate::models::{Item, NewItemRequest, REPORT_ACCEPTED_MESSAGE};
use crate::AppState;

/// Browse result as sent to the page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    pub items: Vec<Item>,
    pub total: usize,
    pub empty: bool,
}

impl From<BrowseView<'_>> for BrowseResponse {
    fn from(view: BrowseView<'_>) -> Self {
        Self {
            items: view.items.into_iter().cloned().collect(),
            total: view.total,
            empty: view.empty,
        }
    }
}

/// Accepted found-item report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub item: Item,
    pub message: String,
}

/// GET /api/items - Filtered, sorted listing.
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<BrowseQuery>,
) -> ApiResult<BrowseResponse> {
    let store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    let config = BrowseConfig::from(&params);
    let view = browse(store.items(), &config);
    tracing::debug!(
        query = %config.query,
        category = %config.category,
        visible = view.total,
        empty = view.is_empty(),
        "Browse"
    );

    success(BrowseResponse::from(view), revision_id)
}

/// GET /api/items/:id - Get a single item.
pub async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Item> {
    let store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    match store.get(&id) {
        Some(item) => success(item.clone(), revision_id),
        None => error(
            AppError::NotFound(format!("Item {} not found", id)),
            revision_id,
        ),
    }
}

/// POST /api/items - Report a found item.
pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<NewItemRequest>,
) -> ApiResult<SubmissionReceipt> {
    let mut store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    let fields = match request.validate() {
        Ok(fields) => fields,
        Err(e) => return error(e, revision_id),
    };

    let item = match store.create(fields) {
        Ok(item) => item,
        Err(e) => return error(e, revision_id),
    };

    match store.save().await {
        Ok(new_revision) => {
            tracing::info!(id = %item.id, category = %item.category, "Found item reported");
            success(
                SubmissionReceipt {
                    item,
                    message: REPORT_ACCEPTED_MESSAGE.to_string(),
                },
                new_revision,
            )
        }
        Err(e) => {
            store.remove(&item.id);
            error(e, revision_id)
        }
    }
}
