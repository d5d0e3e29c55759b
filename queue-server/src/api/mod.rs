//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅注册、查询与策略管理
//! - [`queue`] - 排队操作 (入队/叫号/入座/移除/跳过)
//! - [`events`] - SSE 实时订阅 (总线桥接)

pub mod events;
pub mod health;
pub mod queue;
pub mod restaurants;

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// 并发请求上限 (嵌入式存储，单写者负载特征)
const MAX_IN_FLIGHT_REQUESTS: usize = 512;

/// 组装完整路由
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(queue::router())
        .merge(events::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
}
