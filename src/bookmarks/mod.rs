//! The bookmark subsystem: a content-addressed set of saved articles.
//!
//! [`BookmarkSet`] owns the membership rules (identity by post id,
//! insertion order preserved, no duplicates). [`BookmarkStore`] owns
//! durability and sharing: one storage key, one writer at a time, change
//! notification to every subscribed view.

mod set;
mod store;

pub use set::BookmarkSet;
pub use store::{BookmarkStore, STORAGE_KEY};
