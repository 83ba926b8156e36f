//! Gateway speaking PostgREST (the REST layer behind Supabase projects).
//!
//! Tables: `articles`, `saved_articles(user_id, article_id, created_at)` and
//! `user_preferences(user_id, ...)`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tj_core::storage::{category_filter, page_range};
use tj_core::{ContentItem, DataGateway, Error, ItemId, Preferences, Result};
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct PostgrestConfig {
    pub url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for PostgrestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PostgrestConfig {
    pub fn new(url: &str, api_key: Option<String>) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::Config(format!("Invalid gateway URL {}: {}", url, e)))?;
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("Gateway API key is required".to_string()))?;
        Ok(Self {
            url,
            api_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct SavedRow<'a> {
    user_id: &'a str,
    article_id: ItemId,
}

#[derive(Deserialize)]
struct SavedJoinRow {
    articles: Option<ContentItem>,
}

#[derive(Serialize, Deserialize)]
struct PreferencesRow {
    #[serde(default)]
    user_id: String,
    #[serde(flatten)]
    preferences: Preferences,
}

pub struct PostgrestGateway {
    client: Client,
    config: PostgrestConfig,
}

impl fmt::Debug for PostgrestGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestGateway")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl PostgrestGateway {
    pub fn new(config: PostgrestConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn table(&self, name: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url.as_str().trim_end_matches('/'), name)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }
}

#[async_trait]
impl DataGateway for PostgrestGateway {
    async fn list_items(&self, category: Option<&str>, page: u32) -> Result<Vec<ContentItem>> {
        let (first, last) = page_range(page);
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "date.desc".to_string()),
            ("offset", first.to_string()),
            ("limit", (last - first + 1).to_string()),
        ];
        if let Some(category) = category_filter(category) {
            query.push(("category", format!("eq.{}", category)));
        }
        debug!("GET articles page {} ({:?})", page, category);

        let items = self
            .authorized(self.client.get(self.table("articles")))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ContentItem>>()
            .await?;
        Ok(items)
    }

    async fn insert_saved(&self, item: &ContentItem, user_id: &str) -> Result<()> {
        let row = SavedRow {
            user_id,
            article_id: item.id(),
        };
        self.authorized(self.client.post(self.table("saved_articles")))
            .header("Prefer", "resolution=ignore-duplicates")
            .json(&row)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_saved(&self, item_id: &ItemId, user_id: &str) -> Result<()> {
        self.authorized(self.client.delete(self.table("saved_articles")))
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("article_id", format!("eq.{}", item_id)),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list_saved(&self, user_id: &str) -> Result<Vec<ContentItem>> {
        let rows = self
            .authorized(self.client.get(self.table("saved_articles")))
            .query(&[
                ("select", "article_id,articles(*)".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<SavedJoinRow>>()
            .await?;
        Ok(rows.into_iter().filter_map(|row| row.articles).collect())
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Preferences> {
        let rows = self
            .authorized(self.client.get(self.table("user_preferences")))
            .query(&[("select", "*".to_string()), ("user_id", format!("eq.{}", user_id))])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<PreferencesRow>>()
            .await?;
        Ok(rows.into_iter().next().map(|row| row.preferences).unwrap_or_default())
    }

    async fn set_preferences(&self, preferences: &Preferences, user_id: &str) -> Result<()> {
        let row = PreferencesRow {
            user_id: user_id.to_string(),
            preferences: preferences.clone(),
        };
        self.authorized(self.client.post(self.table("user_preferences")))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
