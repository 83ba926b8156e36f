pub mod error;
pub mod identity;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use identity::identify;
pub use models::{Annotator, BiasResult, Leaning, RelatedItem, SummaryResult, TrajectoryResult};
pub use storage::{DataGateway, PAGE_SIZE};
pub use types::{ContentItem, ItemId, Preferences, Theme, UserIdentity};

pub mod prelude {
    pub use super::{Annotator, ContentItem, DataGateway, Error, ItemId, Result};
}
