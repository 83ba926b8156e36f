//! Gateway backends, the feed and reading list caches, and the user session.
//!
//! The PostgREST backend sits behind the `postgrest` feature; its tests only
//! run with `cargo test -p tj_storage --features postgrest`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod backends;
pub mod cache;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use backends::*;
pub use cache::{FeedCache, FeedState, ReadingListCache, ReadingListState};
pub use session::Session;

pub mod prelude {
    pub use super::backends::*;
    pub use super::cache::{FeedCache, ReadingListCache};
    pub use super::session::Session;
    pub use tj_core::{ContentItem, DataGateway, Error, Result};
}

// No cache update spans a panic point, so a poisoned lock still guards
// consistent data.
pub(crate) fn read_state<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_state<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
