use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tj_core::{ContentItem, DataGateway, Error, ItemId, Preferences, Result};
use tokio::sync::Notify;
use url::Url;

/// `count` items numbered from `start`, newest first.
pub fn numbered_items(start: usize, count: usize) -> Vec<ContentItem> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    (start..start + count)
        .map(|n| ContentItem {
            title: format!("Story {}", n),
            category: "Technology".to_string(),
            published_at: base - Duration::minutes(n as i64),
            author: "Reporter".to_string(),
            image_url: None,
            summary: format!("Summary of story {}", n),
            source_name: "Wire".to_string(),
            source_url: Url::parse(&format!("https://wire.example.com/{}", n)).unwrap(),
        })
        .collect()
}

/// Gateway whose answers are queued up front by the test.
#[derive(Default)]
pub struct ScriptedGateway {
    pages: Mutex<VecDeque<Result<Vec<ContentItem>>>>,
    requested_pages: Mutex<Vec<u32>>,
    saved: Mutex<Vec<ContentItem>>,
    saved_error: Mutex<Option<Error>>,
    insert_error: Mutex<Option<Error>>,
    delete_error: Mutex<Option<Error>>,
    preferences_error: Mutex<Option<Error>>,
    mutation_calls: AtomicUsize,
    saved_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    saved_gate: Option<Arc<Notify>>,
    pub entered: Notify,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(self, pages: Vec<Result<Vec<ContentItem>>>) -> Self {
        *self.pages.lock().unwrap() = pages.into();
        self
    }

    pub fn with_saved(self, saved: Vec<ContentItem>) -> Self {
        *self.saved.lock().unwrap() = saved;
        self
    }

    /// `list_items` signals `entered`, then waits on the returned handle.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// `list_saved` snapshots the saved items, signals `entered`, then waits
    /// on the returned handle.
    pub fn gated_saved(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.saved_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn fail_list_saved(&self, err: Error) {
        *self.saved_error.lock().unwrap() = Some(err);
    }

    pub fn fail_insert(&self, err: Error) {
        *self.insert_error.lock().unwrap() = Some(err);
    }

    pub fn fail_delete(&self, err: Error) {
        *self.delete_error.lock().unwrap() = Some(err);
    }

    pub fn fail_preferences(&self, err: Error) {
        *self.preferences_error.lock().unwrap() = Some(err);
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested_pages.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.requested_pages.lock().unwrap().len()
    }

    pub fn saved_calls(&self) -> usize {
        self.saved_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataGateway for ScriptedGateway {
    async fn list_items(&self, _category: Option<&str>, page: u32) -> Result<Vec<ContentItem>> {
        self.requested_pages.lock().unwrap().push(page);
        if let Some(gate) = &self.gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        self.pages.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn insert_saved(&self, item: &ContentItem, _user_id: &str) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.insert_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut saved = self.saved.lock().unwrap();
        if !saved.contains(item) {
            saved.insert(0, item.clone());
        }
        Ok(())
    }

    async fn delete_saved(&self, item_id: &ItemId, _user_id: &str) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.delete_error.lock().unwrap().take() {
            return Err(err);
        }
        self.saved.lock().unwrap().retain(|s| s.id() != *item_id);
        Ok(())
    }

    async fn list_saved(&self, _user_id: &str) -> Result<Vec<ContentItem>> {
        self.saved_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.saved_error.lock().unwrap().take() {
            return Err(err);
        }
        let snapshot = self.saved.lock().unwrap().clone();
        if let Some(gate) = &self.saved_gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn get_preferences(&self, _user_id: &str) -> Result<Preferences> {
        if let Some(err) = self.preferences_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(Preferences::default())
    }

    async fn set_preferences(&self, _preferences: &Preferences, _user_id: &str) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.preferences_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(())
    }
}
