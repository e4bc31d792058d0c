//! Data models for the Lost & Found board.
//!
//! Field names match the browser page's records so stored collections stay interchangeable.

mod claim;
mod datastore;
mod item;

pub use claim::*;
pub use datastore::*;
pub use item::*;
