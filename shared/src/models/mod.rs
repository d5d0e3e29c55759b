//! Wire 模型 — 发给客户端的快照形态
//!
//! 服务端数据库模型 (RecordId、内部字段) 不直接出网；
//! 统一转换为这里的纯字符串 ID 快照。

mod queue_entry;
mod restaurant;

pub use queue_entry::{EntryStatus, QueueEntrySnapshot, WaitTimeRange};
pub use restaurant::{GeoPoint, IntensityTier, RestaurantSnapshot};
