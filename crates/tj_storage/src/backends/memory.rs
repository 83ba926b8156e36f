use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tj_core::storage::{category_filter, page_range};
use tj_core::{ContentItem, DataGateway, ItemId, Preferences, Result};
use tokio::sync::RwLock;
use url::Url;

pub struct MemoryStore {
    items: Vec<ContentItem>,
    saved: HashMap<String, Vec<ContentItem>>,
    preferences: HashMap<String, Preferences>,
}

impl MemoryStore {
    pub fn new(mut items: Vec<ContentItem>) -> Self {
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Self {
            items,
            saved: HashMap::new(),
            preferences: HashMap::new(),
        }
    }

    pub fn list_items(&self, category: Option<&str>, page: u32) -> Vec<ContentItem> {
        let (first, last) = page_range(page);
        let filter = category_filter(category);
        self.items
            .iter()
            .filter(|item| filter.map_or(true, |c| item.category == c))
            .skip(first as usize)
            .take((last - first + 1) as usize)
            .cloned()
            .collect()
    }

    pub fn insert_saved(&mut self, item: &ContentItem, user_id: &str) {
        let saved = self.saved.entry(user_id.to_string()).or_default();
        let id = item.id();
        if !saved.iter().any(|s| s.id() == id) {
            saved.insert(0, item.clone());
        }
    }

    pub fn delete_saved(&mut self, item_id: &ItemId, user_id: &str) {
        if let Some(saved) = self.saved.get_mut(user_id) {
            saved.retain(|s| s.id() != *item_id);
        }
    }

    pub fn list_saved(&self, user_id: &str) -> Vec<ContentItem> {
        self.saved.get(user_id).cloned().unwrap_or_default()
    }
}

/// Process-local gateway used for offline runs and tests.
#[derive(Clone)]
pub struct InMemoryGateway {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryGateway {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(items))),
        }
    }

    /// A small story that unfolds over three days.
    pub fn with_demo_items() -> Self {
        Self::new(demo_items())
    }
}

#[async_trait]
impl DataGateway for InMemoryGateway {
    async fn list_items(&self, category: Option<&str>, page: u32) -> Result<Vec<ContentItem>> {
        let store = self.store.read().await;
        Ok(store.list_items(category, page))
    }

    async fn insert_saved(&self, item: &ContentItem, user_id: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.insert_saved(item, user_id);
        Ok(())
    }

    async fn delete_saved(&self, item_id: &ItemId, user_id: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.delete_saved(item_id, user_id);
        Ok(())
    }

    async fn list_saved(&self, user_id: &str) -> Result<Vec<ContentItem>> {
        let store = self.store.read().await;
        Ok(store.list_saved(user_id))
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Preferences> {
        let store = self.store.read().await;
        Ok(store.preferences.get(user_id).cloned().unwrap_or_default())
    }

    async fn set_preferences(&self, preferences: &Preferences, user_id: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.preferences.insert(user_id.to_string(), preferences.clone());
        Ok(())
    }
}

fn demo_item(title: &str, day: u32, author: &str, slug: &str, summary: &str) -> Option<ContentItem> {
    Some(ContentItem {
        title: title.to_string(),
        category: "Technology".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).single()?,
        author: author.to_string(),
        image_url: Url::parse(&format!("https://example.com/{}.jpg", slug)).ok(),
        summary: summary.to_string(),
        source_name: "Tech Insights Daily".to_string(),
        source_url: Url::parse(&format!("https://techinsights.example.com/{}", slug)).ok()?,
    })
}

pub fn demo_items() -> Vec<ContentItem> {
    [
        demo_item(
            "AI Breakthrough: New Model Shows Human-Like Understanding",
            1,
            "Sarah Chen",
            "ai-breakthrough",
            "Researchers have developed a language model with unprecedented contextual understanding. \
             Experts caution that more research is needed to understand its limitations and biases.",
        ),
        demo_item(
            "AI Ethics Board Raises Concerns Over New Model",
            2,
            "Michael Roberts",
            "ai-ethics-concerns",
            "The International AI Ethics Board raised questions about privacy and potential misuse. \
             The board called for independent testing and greater transparency.",
        ),
        demo_item(
            "Industry Leaders Respond to AI Breakthrough",
            3,
            "David Kim",
            "industry-response",
            "Major tech companies announced plans to integrate similar technology while others remain skeptical. \
             Smaller firms worry about concentration of capabilities among a few players.",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
