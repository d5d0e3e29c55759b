//! 队列域模块
//!
//! - [`engine`] - 队列排序引擎 (入队/叫号/入座/移除/跳过 + 重排序)
//! - [`estimate`] - 等待时间估算、队列强度、高峰时段
//! - [`grace`] - 宽限期后台扫描 (eager 物化)

pub mod engine;
pub mod estimate;
pub mod grace;

pub use engine::{JoinRequest, QueueEngine, QueueError, QueueResult};
pub use estimate::{WaitEstimate, estimate, intensity_tier, is_peak_hours, queue_intensity};
pub use grace::GraceSweeper;
