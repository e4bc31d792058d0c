//! Found-item model matching the browser page's item records.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Message shown when the found-item form is incomplete.
pub const REPORT_INCOMPLETE_MESSAGE: &str = "Please fill out all required fields.";

/// Message shown after a found item was accepted.
pub const REPORT_ACCEPTED_MESSAGE: &str = "Thank you! Your item has been submitted for review.";

/// Review and claim lifecycle of an item.
///
/// Moves forward only: `Pending -> Approved -> Claimed`. Removal is not a
/// status; a removed item is simply gone from the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Approved,
    Claimed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Approved => "approved",
            ItemStatus::Claimed => "claimed",
        }
    }

    /// The status a normal workflow step leads to, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            ItemStatus::Pending => Some(ItemStatus::Approved),
            ItemStatus::Approved => Some(ItemStatus::Claimed),
            ItemStatus::Claimed => None,
        }
    }
}

/// A found-item report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    pub date: String,
    pub description: String,
    pub finder_name: String,
    pub finder_contact: String,
    #[serde(default)]
    pub photo_data_url: Option<String>,
    pub status: ItemStatus,
    /// Milliseconds since the Unix epoch. Only used for ordering.
    #[serde(default)]
    pub created_at: i64,
}

/// Request body for reporting a found item.
///
/// The photo must already be read into a data URL by the client; an upload
/// that is still in flight is simply not part of the report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub finder_name: String,
    #[serde(default)]
    pub finder_contact: String,
    #[serde(default)]
    pub photo_data_url: Option<String>,
}

/// Trimmed, checked fields of a found-item report, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub category: String,
    pub location: String,
    pub date: String,
    pub description: String,
    pub finder_name: String,
    pub finder_contact: String,
    pub photo_data_url: Option<String>,
}

impl NewItemRequest {
    /// Trim all text fields and check that none of the required ones is empty.
    pub fn validate(self) -> Result<NewItem, AppError> {
        let item = NewItem {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            location: self.location.trim().to_string(),
            date: self.date.trim().to_string(),
            description: self.description.trim().to_string(),
            finder_name: self.finder_name.trim().to_string(),
            finder_contact: self.finder_contact.trim().to_string(),
            photo_data_url: self
                .photo_data_url
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        };

        let required = [
            &item.title,
            &item.category,
            &item.location,
            &item.date,
            &item.description,
            &item.finder_name,
            &item.finder_contact,
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err(AppError::Validation(REPORT_INCOMPLETE_MESSAGE.to_string()));
        }

        if let Some(photo) = &item.photo_data_url {
            if !photo.starts_with("data:image/") {
                return Err(AppError::Validation(
                    "Photo must be an image data URL.".to_string(),
                ));
            }
        }

        Ok(item)
    }
}
