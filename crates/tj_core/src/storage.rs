use async_trait::async_trait;

use crate::types::{ContentItem, ItemId, Preferences};
use crate::Result;

/// Items per feed page.
pub const PAGE_SIZE: u32 = 20;

/// Pseudo-category meaning "every category".
pub const ALL_CATEGORIES: &str = "All";

/// Inclusive row range `(first, last)` covered by a 1-based page.
pub fn page_range(page: u32) -> (u64, u64) {
    let page = u64::from(page.max(1));
    let size = u64::from(PAGE_SIZE);
    ((page - 1) * size, page * size - 1)
}

/// Normalises a requested category into a filter; `None`, empty and `All`
/// mean no filtering.
pub fn category_filter(category: Option<&str>) -> Option<&str> {
    match category.map(str::trim) {
        None | Some("") => None,
        Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => None,
        Some(c) => Some(c),
    }
}

/// The remote data store holding the feed, saved items and preferences.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// One page of items, newest first.
    async fn list_items(&self, category: Option<&str>, page: u32) -> Result<Vec<ContentItem>>;

    /// Record `item` as saved by `user_id`.
    async fn insert_saved(&self, item: &ContentItem, user_id: &str) -> Result<()>;

    /// Forget a saved item for `user_id`.
    async fn delete_saved(&self, item_id: &ItemId, user_id: &str) -> Result<()>;

    /// Saved items, most recently saved first.
    async fn list_saved(&self, user_id: &str) -> Result<Vec<ContentItem>>;

    async fn get_preferences(&self, user_id: &str) -> Result<Preferences>;

    async fn set_preferences(&self, preferences: &Preferences, user_id: &str) -> Result<()>;
}
