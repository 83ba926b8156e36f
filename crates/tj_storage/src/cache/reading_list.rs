//! Saved items for the signed-in user.
//!
//! Mutations are confirm-then-apply: the gateway call goes first and the local
//! list only changes once it succeeds, so the list never holds an entry that
//! failed to persist. A load that was issued before a confirmed mutation is
//! discarded when it lands, since its snapshot no longer reflects the server.

use std::sync::{Arc, RwLock};

use tj_core::{ContentItem, DataGateway, Error, ItemId};
use tracing::{debug, info, warn};

use crate::{read_state, write_state};

#[derive(Debug, Clone, Default)]
pub struct ReadingListState {
    /// Most recently saved first.
    pub items: Vec<ContentItem>,
    pub loading: bool,
    pub error: Option<Error>,
    /// Bumped by every confirmed save or remove.
    pub generation: u64,
}

pub struct ReadingListCache {
    gateway: Arc<dyn DataGateway>,
    state: RwLock<ReadingListState>,
}

struct Loading<'a>(&'a RwLock<ReadingListState>);

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        write_state(self.0).loading = false;
    }
}

impl ReadingListCache {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(ReadingListState::default()),
        }
    }

    /// Replace the local list with the user's saved items.
    ///
    /// A call made while another load is in flight returns without touching
    /// the gateway.
    pub async fn load(&self, user_id: &str) {
        let generation = {
            let mut state = write_state(&self.state);
            if state.loading {
                debug!("Reading list load already in flight, skipping");
                return;
            }
            state.loading = true;
            state.generation
        };
        let _loading = Loading(&self.state);

        let result = self.gateway.list_saved(user_id).await;
        let mut state = write_state(&self.state);
        match result {
            Ok(_) if state.generation != generation => {
                debug!("Reading list changed during load, discarding stale snapshot");
            }
            Ok(items) => {
                info!("🔖 Reading list loaded: {} items", items.len());
                state.items = items;
            }
            Err(e) => {
                warn!("Failed to load reading list: {}", e);
                state.error = Some(e);
            }
        }
    }

    pub async fn save(&self, item: &ContentItem, user_id: &str) {
        let id = item.id();
        if let Err(e) = self.gateway.insert_saved(item, user_id).await {
            warn!("Failed to save {}: {}", id, e);
            write_state(&self.state).error = Some(e);
            return;
        }

        let mut state = write_state(&self.state);
        state.generation += 1;
        if state.items.iter().any(|saved| saved.id() == id) {
            debug!("{} already in reading list", id);
        } else {
            state.items.insert(0, item.clone());
            debug!("Saved {}", id);
        }
    }

    pub async fn remove(&self, item: &ContentItem, user_id: &str) {
        let id = item.id();
        if let Err(e) = self.gateway.delete_saved(&id, user_id).await {
            warn!("Failed to remove {}: {}", id, e);
            write_state(&self.state).error = Some(e);
            return;
        }

        let mut state = write_state(&self.state);
        state.generation += 1;
        state.items.retain(|saved| saved.id() != id);
        debug!("Removed {}", id);
    }

    /// Save `item` if absent, remove it otherwise.
    pub async fn toggle(&self, item: &ContentItem, user_id: &str) {
        if self.contains(&item.id()) {
            self.remove(item, user_id).await;
        } else {
            self.save(item, user_id).await;
        }
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        read_state(&self.state).items.iter().any(|saved| saved.id() == *id)
    }

    pub fn items(&self) -> Vec<ContentItem> {
        read_state(&self.state).items.clone()
    }

    pub fn is_loading(&self) -> bool {
        read_state(&self.state).loading
    }

    pub fn error(&self) -> Option<Error> {
        read_state(&self.state).error.clone()
    }

    pub fn clear_error(&self) {
        write_state(&self.state).error = None;
    }

    /// Drop everything, e.g. on sign-out.
    pub fn clear(&self) {
        let mut state = write_state(&self.state);
        let generation = state.generation + 1;
        *state = ReadingListState {
            generation,
            ..ReadingListState::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{numbered_items, ScriptedGateway};

    const USER: &str = "user-1";

    #[tokio::test]
    async fn test_load_replaces_list() {
        let items = numbered_items(0, 3);
        let gateway = Arc::new(ScriptedGateway::new().with_saved(items.clone()));
        let cache = ReadingListCache::new(gateway);

        cache.load(USER).await;
        assert_eq!(cache.items(), items);
        assert!(!cache.is_loading());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_list() {
        let items = numbered_items(0, 2);
        let gateway = Arc::new(ScriptedGateway::new().with_saved(items.clone()));
        let cache = ReadingListCache::new(gateway.clone());
        cache.load(USER).await;

        gateway.fail_list_saved(Error::NetworkFailure("timeout".to_string()));
        cache.load(USER).await;
        assert_eq!(cache.items(), items);
        assert!(matches!(cache.error(), Some(Error::NetworkFailure(_))));
    }

    #[tokio::test]
    async fn test_save_inserts_at_front_once() {
        let items = numbered_items(0, 3);
        let gateway = Arc::new(ScriptedGateway::new());
        let cache = ReadingListCache::new(gateway.clone());

        cache.save(&items[0], USER).await;
        cache.save(&items[1], USER).await;
        cache.save(&items[0], USER).await;

        assert_eq!(cache.items(), vec![items[1].clone(), items[0].clone()]);
        let matching = cache.items().iter().filter(|i| i.id() == items[0].id()).count();
        assert_eq!(matching, 1);
        assert_eq!(gateway.mutation_calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_list_unchanged() {
        let items = numbered_items(0, 2);
        let gateway = Arc::new(ScriptedGateway::new());
        let cache = ReadingListCache::new(gateway.clone());
        cache.save(&items[0], USER).await;

        gateway.fail_insert(Error::ServerError(409));
        cache.save(&items[1], USER).await;

        assert_eq!(cache.items(), vec![items[0].clone()]);
        assert!(!cache.contains(&items[1].id()));
        assert_eq!(cache.error(), Some(Error::ServerError(409)));
    }

    #[tokio::test]
    async fn test_remove_drops_matching_entries() {
        let items = numbered_items(0, 3);
        let gateway = Arc::new(ScriptedGateway::new().with_saved(items.clone()));
        let cache = ReadingListCache::new(gateway);
        cache.load(USER).await;

        cache.remove(&items[1], USER).await;
        assert_eq!(cache.items(), vec![items[0].clone(), items[2].clone()]);
    }

    #[tokio::test]
    async fn test_failed_remove_leaves_list_unchanged() {
        let items = numbered_items(0, 2);
        let gateway = Arc::new(ScriptedGateway::new().with_saved(items.clone()));
        let cache = ReadingListCache::new(gateway.clone());
        cache.load(USER).await;

        gateway.fail_delete(Error::ServerError(500));
        cache.remove(&items[0], USER).await;
        assert_eq!(cache.items(), items);
        assert_eq!(cache.error(), Some(Error::ServerError(500)));

        cache.clear_error();
        assert_eq!(cache.error(), None);
    }

    #[tokio::test]
    async fn test_concurrent_load_is_single_flight() {
        let (gateway, gate) = ScriptedGateway::new()
            .with_saved(numbered_items(0, 2))
            .gated_saved();
        let gateway = Arc::new(gateway);
        let cache = Arc::new(ReadingListCache::new(gateway.clone()));

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.load(USER).await }
        });
        gateway.entered.notified().await;
        assert!(cache.is_loading());

        cache.load(USER).await;
        assert!(cache.is_loading());
        assert_eq!(gateway.saved_calls(), 1);

        gate.notify_one();
        first.await.unwrap();
        assert!(!cache.is_loading());
        assert_eq!(cache.items().len(), 2);
    }

    #[tokio::test]
    async fn test_load_started_before_save_does_not_undo_it() {
        let items = numbered_items(0, 1);
        let (gateway, gate) = ScriptedGateway::new().gated_saved();
        let gateway = Arc::new(gateway);
        let cache = Arc::new(ReadingListCache::new(gateway.clone()));

        let pending = tokio::spawn({
            let cache = cache.clone();
            async move { cache.load(USER).await }
        });
        gateway.entered.notified().await;

        cache.save(&items[0], USER).await;
        assert!(cache.contains(&items[0].id()));

        gate.notify_one();
        pending.await.unwrap();
        assert!(cache.contains(&items[0].id()));
        assert!(!cache.is_loading());

        // A load issued after the save sees the persisted entry.
        let follow_up = tokio::spawn({
            let cache = cache.clone();
            async move { cache.load(USER).await }
        });
        gateway.entered.notified().await;
        gate.notify_one();
        follow_up.await.unwrap();
        assert_eq!(cache.items(), items);
    }

    #[tokio::test]
    async fn test_toggle_and_clear() {
        let items = numbered_items(0, 1);
        let cache = ReadingListCache::new(Arc::new(ScriptedGateway::new()));

        cache.toggle(&items[0], USER).await;
        assert!(cache.contains(&items[0].id()));
        cache.toggle(&items[0], USER).await;
        assert!(!cache.contains(&items[0].id()));

        cache.save(&items[0], USER).await;
        cache.clear();
        assert!(cache.items().is_empty());
    }
}
