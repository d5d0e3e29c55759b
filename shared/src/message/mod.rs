//! 消息总线消息类型定义
//!
//! 这些类型在 queue-server 和客户端之间共享。
//! 传输层为进程内 broadcast 通道，消费者通过 SSE 或进程内订阅接收。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;

/// 消息总线事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 系统通知
    Notification = 0,
    /// 队列快照 (某餐厅当前等待列表全量)
    QueueSync = 1,
    /// 餐厅记录同步 (策略/缓存字段变更)
    RestaurantSync = 2,
    /// 单个队列条目变更 (终态转换等)
    EntrySync = 3,
}

/// 未知的事件类型编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event type: {0}")]
pub struct UnknownEventType(pub u8);

impl TryFrom<u8> for EventType {
    type Error = UnknownEventType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Notification),
            1 => Ok(EventType::QueueSync),
            2 => Ok(EventType::RestaurantSync),
            3 => Ok(EventType::EntrySync),
            other => Err(UnknownEventType(other)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::QueueSync => write!(f, "queue_sync"),
            EventType::RestaurantSync => write!(f, "restaurant_sync"),
            EventType::EntrySync => write!(f, "entry_sync"),
        }
    }
}

/// 消息总线消息体
///
/// payload 为 JSON 序列化后的载荷字节，具体类型由 `event_type` 决定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    /// 关联的餐厅 ID，订阅端按此过滤
    pub restaurant_id: Option<String>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            restaurant_id: None,
            payload,
        }
    }

    /// 设置关联餐厅
    pub fn with_restaurant(mut self, restaurant_id: &str) -> Self {
        self.restaurant_id = Some(restaurant_id.to_string());
        self
    }

    /// 创建队列快照消息
    pub fn queue_sync(payload: &QueueSnapshotPayload) -> Self {
        let bytes = serde_json::to_vec(payload).expect("Failed to serialize queue snapshot");
        Self::new(EventType::QueueSync, bytes).with_restaurant(&payload.restaurant_id)
    }

    /// 创建餐厅同步消息
    pub fn restaurant_sync(payload: &RestaurantSyncPayload) -> Self {
        let bytes = serde_json::to_vec(payload).expect("Failed to serialize restaurant sync");
        Self::new(EventType::RestaurantSync, bytes).with_restaurant(&payload.id)
    }

    /// 创建单条目同步消息
    pub fn entry_sync(restaurant_id: &str, payload: &EntrySyncPayload) -> Self {
        let bytes = serde_json::to_vec(payload).expect("Failed to serialize entry sync");
        Self::new(EventType::EntrySync, bytes).with_restaurant(restaurant_id)
    }

    /// 解析载荷
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
