//! Claim submission endpoint.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::models::{ClaimReceipt, ClaimRequest, CLAIM_ACCEPTED_MESSAGE};
use crate::AppState;

/// POST /api/claims - Submit a claim for an item.
pub async fn submit_claim(
    State(state): State<AppState>,
    Json(request): Json<ClaimRequest>,
) -> ApiResult<ClaimReceipt> {
    let revision_id = state.store.lock().await.revision_id().await.unwrap_or(0);

    if let Err(e) = request.validate() {
        return error(e, revision_id);
    }

    let reference = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        reference = %reference,
        item_id = %request.item_id.trim(),
        relation = %request.relation,
        preferred = request.preferred_contact().unwrap_or("-"),
        "Claim submitted"
    );

    success(
        ClaimReceipt {
            reference,
            item_id: request.item_id.trim().to_string(),
            preferred: request.preferred_contact().map(str::to_string),
            message: CLAIM_ACCEPTED_MESSAGE.to_string(),
        },
        revision_id,
    )
}
