pub mod feed;
pub mod reading_list;

pub use feed::{FeedCache, FeedState};
pub use reading_list::{ReadingListCache, ReadingListState};
