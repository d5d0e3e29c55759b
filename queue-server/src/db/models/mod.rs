//! Database models
//!
//! SurrealDB 文档形态的实体。历史文档可能缺字段，
//! 缺省值统一在反序列化边界补齐 (serde defaults)，业务逻辑不再散落兜底。

pub mod serde_helpers;

mod queue_entry;
mod restaurant;

pub use queue_entry::QueueEntry;
pub use restaurant::{Restaurant, RestaurantCreate};

// Wire 层的枚举与餐厅快照直接复用 shared 的定义
pub use shared::models::{EntryStatus, GeoPoint, WaitTimeRange};
