//! Derived identity for content items.
//!
//! Items carry no storage-assigned key. Two fetches of the same article (from
//! the plain feed and from the saved-articles join, or from two different
//! runs) must agree on the identifier, so it is computed from the fields that
//! define the article: title, source name and publication timestamp.

use chrono::SecondsFormat;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::types::{ContentItem, ItemId};

// ASCII unit separator; keeps ("ab", "c") and ("a", "bc") apart.
const FIELD_SEPARATOR: u8 = 0x1f;

pub fn identify(item: &ContentItem) -> ItemId {
    let timestamp = item.published_at.to_rfc3339_opts(SecondsFormat::Nanos, true);

    let mut hasher = Sha256::new();
    hasher.update(item.title.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(item.source_name.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(timestamp.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    ItemId::from(Uuid::from_bytes(bytes))
}
