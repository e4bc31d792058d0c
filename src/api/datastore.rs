//! Revision and counter endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{RevisionInfo, Stats};
use crate::AppState;

/// GET /api/revision - Get the current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let store = state.store.lock().await;
    let revision_info = store
        .repository()
        .get_revision_info()
        .await
        .map_err(|e| crate::errors::AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    success(revision_info.clone(), revision_info.revision_id)
}

/// GET /api/stats - Total, pending and claimed counts.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Stats> {
    let store = state.store.lock().await;
    let revision_id = store.revision_id().await.unwrap_or(0);

    success(store.stats(), revision_id)
}
