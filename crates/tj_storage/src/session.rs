use std::sync::{Arc, RwLock};

use tj_core::{ContentItem, DataGateway, Error, Preferences, Result, UserIdentity};
use tracing::info;

use crate::cache::{FeedCache, ReadingListCache};
use crate::{read_state, write_state};

/// Everything that lives for one signed-in session: both caches, the user's
/// identity and their preferences. Built once and passed around by reference.
pub struct Session {
    gateway: Arc<dyn DataGateway>,
    feed: FeedCache,
    reading_list: ReadingListCache,
    user: RwLock<Option<UserIdentity>>,
    preferences: RwLock<Option<Preferences>>,
}

impl Session {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            feed: FeedCache::new(gateway.clone()),
            reading_list: ReadingListCache::new(gateway.clone()),
            gateway,
            user: RwLock::new(None),
            preferences: RwLock::new(None),
        }
    }

    pub fn feed(&self) -> &FeedCache {
        &self.feed
    }

    pub fn reading_list(&self) -> &ReadingListCache {
        &self.reading_list
    }

    pub fn user(&self) -> Option<UserIdentity> {
        read_state(&self.user).clone()
    }

    pub fn user_id(&self) -> Result<String> {
        read_state(&self.user)
            .as_ref()
            .map(|user| user.user_id.clone())
            .ok_or(Error::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        read_state(&self.user).is_some()
    }

    pub fn preferences(&self) -> Option<Preferences> {
        read_state(&self.preferences).clone()
    }

    /// Adopt an identity produced by the external sign-in flow.
    ///
    /// Preferences must load for the sign-in to stick; the reading list is
    /// loaded afterwards and records its own failure.
    pub async fn sign_in(&self, identity: UserIdentity) -> Result<()> {
        let preferences = self.gateway.get_preferences(&identity.user_id).await?;
        let user_id = identity.user_id.clone();

        *write_state(&self.preferences) = Some(preferences);
        *write_state(&self.user) = Some(identity);
        info!("👤 Signed in as {}", user_id);

        self.reading_list.load(&user_id).await;
        Ok(())
    }

    pub fn sign_out(&self) {
        *write_state(&self.user) = None;
        *write_state(&self.preferences) = None;
        self.reading_list.clear();
        info!("👋 Signed out");
    }

    pub async fn save(&self, item: &ContentItem) -> Result<()> {
        let user_id = self.user_id()?;
        self.reading_list.save(item, &user_id).await;
        Ok(())
    }

    pub async fn remove(&self, item: &ContentItem) -> Result<()> {
        let user_id = self.user_id()?;
        self.reading_list.remove(item, &user_id).await;
        Ok(())
    }

    pub async fn toggle_saved(&self, item: &ContentItem) -> Result<()> {
        let user_id = self.user_id()?;
        self.reading_list.toggle(item, &user_id).await;
        Ok(())
    }

    pub async fn update_preferences(&self, preferences: Preferences) -> Result<()> {
        let user_id = self.user_id()?;
        self.gateway.set_preferences(&preferences, &user_id).await?;
        *write_state(&self.preferences) = Some(preferences);
        Ok(())
    }
}
