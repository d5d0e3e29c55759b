//! QueueLine 共享类型
//!
//! 服务器与客户端共用的类型定义：
//! - `message`: 消息总线信封与同步载荷
//! - `models`: 队列/餐厅快照 (wire 格式)

pub mod message;
pub mod models;

pub use message::{BusMessage, EventType, QueueSnapshotPayload, RestaurantSyncPayload};
pub use models::{QueueEntrySnapshot, RestaurantSnapshot};
