//! Queue API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants/{id}/queue | GET | 当前等待列表 | 无 |
//! | /api/restaurants/{id}/queue | POST | 入队 | 无 |
//! | /api/restaurants/{id}/queue/call-next | POST | 叫号队首 | 店主 |
//! | /api/queue/{entry_id} | GET | 条目状态 | 无 |
//! | /api/queue/{entry_id}/notify | POST | 通知返回 + 宽限期 | 店主 |
//! | /api/queue/{entry_id}/admit | POST | 入座 | 店主 |
//! | /api/queue/{entry_id}/remove | POST | 移除 | 店主 |
//! | /api/queue/{entry_id}/skip | POST | 跳过 | 店主 |
//! | /api/queue/{entry_id}/cancel | POST | 顾客取消 | 无 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/restaurants/{id}/queue", restaurant_routes())
        .nest("/api/queue", entry_routes())
}

fn restaurant_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::waiting_list).post(handler::join))
        .route("/call-next", post(handler::call_next))
}

fn entry_routes() -> Router<ServerState> {
    Router::new()
        .route("/{entry_id}", get(handler::get_entry))
        .route("/{entry_id}/notify", post(handler::notify))
        .route("/{entry_id}/admit", post(handler::admit))
        .route("/{entry_id}/remove", post(handler::remove))
        .route("/{entry_id}/skip", post(handler::skip))
        .route("/{entry_id}/cancel", post(handler::cancel))
}
