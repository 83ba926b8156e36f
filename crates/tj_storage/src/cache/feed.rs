//! Paginated, deduplicated feed.
//!
//! The cursor only moves after a page comes back successfully, so a failed
//! fetch is retried from the same page on the next call. An empty page is the
//! only exhaustion signal; the gateway never reports a total.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tj_core::{ContentItem, DataGateway, Error, ItemId};
use tracing::{debug, info, warn};

use crate::{read_state, write_state};

/// Categories offered by the feed filter. `All` disables filtering.
pub const CATEGORIES: &[&str] = &["All", "Technology", "Business", "Science", "Politics"];

#[derive(Debug, Clone)]
pub struct FeedState {
    pub items: Vec<ContentItem>,
    /// Next page to request, starting at 1.
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<Error>,
    pub category: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            has_more: true,
            loading: false,
            error: None,
            category: None,
        }
    }
}

pub struct FeedCache {
    gateway: Arc<dyn DataGateway>,
    state: RwLock<FeedState>,
    ids: RwLock<HashSet<ItemId>>,
}

// Clears the loading flag even if the fetch future is dropped mid-flight.
struct InFlight<'a>(&'a RwLock<FeedState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        write_state(self.0).loading = false;
    }
}

impl FeedCache {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(FeedState::default()),
            ids: RwLock::new(HashSet::new()),
        }
    }

    pub fn categories(&self) -> &'static [&'static str] {
        CATEGORIES
    }

    /// Fetch the next page, or page 1 when `refresh` is set.
    ///
    /// A call made while another fetch is in flight returns without touching
    /// the gateway. Failures are recorded in [`FeedCache::error`].
    pub async fn fetch_page(&self, category: Option<&str>, refresh: bool) {
        let page = {
            let mut state = write_state(&self.state);
            if state.loading {
                debug!("Feed fetch already in flight, skipping");
                return;
            }
            if !refresh && !state.has_more {
                debug!("Feed exhausted at page {}", state.page);
                return;
            }
            state.loading = true;
            if refresh {
                1
            } else {
                state.page
            }
        };
        let _in_flight = InFlight(&self.state);

        debug!("Fetching feed page {} (category: {:?})", page, category);
        let result = self.gateway.list_items(category, page).await;

        let mut state = write_state(&self.state);
        let mut ids = write_state(&self.ids);
        match result {
            Ok(items) => {
                let received = items.len();
                if refresh {
                    state.items.clear();
                    ids.clear();
                }
                for item in items {
                    if ids.insert(item.id()) {
                        state.items.push(item);
                    }
                }
                state.page = page + 1;
                state.has_more = received > 0;
                state.category = category.map(str::to_string);
                info!(
                    "📰 Feed page {} loaded: {} items ({} cached)",
                    page,
                    received,
                    state.items.len()
                );
            }
            Err(e) => {
                warn!("Failed to fetch feed page {}: {}", page, e);
                state.error = Some(e);
            }
        }
    }

    pub fn clear_error(&self) {
        write_state(&self.state).error = None;
    }

    pub fn items(&self) -> Vec<ContentItem> {
        read_state(&self.state).items.clone()
    }

    pub fn page(&self) -> u32 {
        read_state(&self.state).page
    }

    pub fn has_more(&self) -> bool {
        read_state(&self.state).has_more
    }

    pub fn is_loading(&self) -> bool {
        read_state(&self.state).loading
    }

    pub fn error(&self) -> Option<Error> {
        read_state(&self.state).error.clone()
    }

    pub fn snapshot(&self) -> FeedState {
        read_state(&self.state).clone()
    }
}
