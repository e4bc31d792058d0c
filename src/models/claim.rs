//! Claim submission model.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Message shown when the claim form is incomplete.
pub const CLAIM_INCOMPLETE_MESSAGE: &str = "Please fill in all required fields.";

/// Message shown after a claim was accepted.
pub const CLAIM_ACCEPTED_MESSAGE: &str =
    "Your claim has been submitted. Staff will review and contact you using the details provided.";

/// Request body for claiming an item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// How the claimant relates to the item (owner, parent, ...)
    #[serde(default)]
    pub relation: String,
    #[serde(default)]
    pub details: String,
    /// Preferred contact method, optional
    #[serde(default)]
    pub preferred: Option<String>,
}

impl ClaimRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            &self.item_id,
            &self.name,
            &self.email,
            &self.relation,
            &self.details,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::Validation(CLAIM_INCOMPLETE_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Preferred contact method, `None` when left blank.
    pub fn preferred_contact(&self) -> Option<&str> {
        self.preferred
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Acknowledgement returned for an accepted claim.
///
/// Claims are not stored and do not change the item's status; staff follow
/// up out of band and use the admin view to mark the item claimed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    pub reference: String,
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<String>,
    pub message: String,
}
