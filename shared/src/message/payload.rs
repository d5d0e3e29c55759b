//! 消息载荷类型

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{QueueEntrySnapshot, RestaurantSnapshot};

// ==================== Notification ====================

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// 系统通知载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub level: NotificationLevel,
    pub message: String,
    /// Unix millis
    pub timestamp: i64,
}

impl NotificationPayload {
    /// 以当前时刻为时间戳构造通知
    pub fn now(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

// ==================== Sync payloads ====================

/// 队列快照载荷 — 某餐厅当前活跃 (waiting/called) 条目的全量有序列表
///
/// 每次成功的变更操作发布一次。重排序后的批量写入只产生一条快照，
/// 订阅端不会观察到部分重排的中间状态。投递语义为 at-least-once，
/// 消费者必须容忍重复的相同快照；`version` 单调递增，用于丢弃乱序旧快照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshotPayload {
    pub restaurant_id: String,
    /// 快照版本号，按餐厅单调递增
    pub version: u64,
    /// 按 position 升序的活跃条目
    pub entries: Vec<QueueEntrySnapshot>,
}

/// 餐厅记录同步载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSyncPayload {
    pub id: String,
    pub version: u64,
    pub restaurant: RestaurantSnapshot,
}

/// 单个条目变更载荷 (终态转换：seated / cancelled / skipped)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySyncPayload {
    pub entry: QueueEntrySnapshot,
}
