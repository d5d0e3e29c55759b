//! Queue engine errors
//!
//! 全部为调用方输入或状态前置条件违规，引擎不自动重试。
//! 消息携带被违反的边界，调用方可直接展示。

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::models::EntryStatus;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue is currently paused. Please try again later.")]
    QueuePaused,

    #[error("Party size {party_size} is outside the allowed range {min}-{max}")]
    InvalidPartySize { party_size: u32, min: u32, max: u32 },

    #[error("Queue is empty")]
    EmptyQueue,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Cannot {op} entry in terminal state '{from}'")]
    InvalidTransition { from: EntryStatus, op: &'static str },

    /// 存储层瞬时故障，调用方可自行重试；引擎不重试，
    /// 避免半写之后的重试产生重复条目。
    #[error("Store unavailable: {0}")]
    Store(String),
}

pub type QueueResult<T> = Result<T, QueueError>;

impl From<RepoError> for QueueError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => QueueError::NotFound(msg),
            RepoError::Validation(msg) => QueueError::NotFound(msg),
            RepoError::Database(msg) => QueueError::Store(msg),
        }
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        match &err {
            QueueError::QueuePaused => AppError::business_rule(err.to_string()),
            QueueError::InvalidPartySize { .. } => AppError::validation(err.to_string()),
            QueueError::EmptyQueue => AppError::business_rule(err.to_string()),
            QueueError::NotFound(msg) => AppError::not_found(msg.clone()),
            QueueError::InvalidRange(msg) => AppError::validation(msg.clone()),
            QueueError::InvalidTransition { .. } => AppError::conflict(err.to_string()),
            QueueError::Store(msg) => AppError::store_unavailable(msg.clone()),
        }
    }
}
