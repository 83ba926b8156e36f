use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::identity::identify;

/// Identifier derived from an item's title, source and publication time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ItemId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One feed entry. Immutable once fetched; equality goes through [`ItemId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub category: String,
    #[serde(rename = "date")]
    pub published_at: DateTime<Utc>,
    pub author: String,
    #[serde(default)]
    pub image_url: Option<Url>,
    pub summary: String,
    pub source_name: String,
    pub source_url: Url,
}

impl ContentItem {
    pub fn id(&self) -> ItemId {
        identify(self)
    }
}

impl PartialEq for ContentItem {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ContentItem {}

impl Hash for ContentItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(Theme::System),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_notifications")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_text_size")]
    pub text_size: f64,
    #[serde(default)]
    pub selected_categories: BTreeSet<String>,
}

fn default_notifications() -> bool {
    true
}

fn default_text_size() -> f64 {
    1.0
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications_enabled: default_notifications(),
            theme: Theme::default(),
            text_size: default_text_size(),
            selected_categories: BTreeSet::new(),
        }
    }
}

/// What the external sign-in flow hands back. Only `user_id` is used as a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            email: None,
        }
    }
}
