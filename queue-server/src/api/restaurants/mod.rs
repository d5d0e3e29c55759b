//! Restaurant API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants | GET | 全部餐厅 (按名称排序) | 无 |
//! | /api/restaurants/nearby | GET | 半径内餐厅 (默认 10km) | 无 |
//! | /api/restaurants/{id} | GET | 单个餐厅快照 | 无 |
//! | /api/restaurants | POST | 注册餐厅 | JWT |
//! | /api/restaurants/{id}/pause | PUT | 暂停/恢复排队 | 店主 |
//! | /api/restaurants/{id}/party-size | PUT | 人数上下限 | 店主 |
//! | /api/restaurants/{id}/grace-period | PUT | 宽限期时长 | 店主 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/nearby", get(handler::nearby))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pause", put(handler::set_pause))
        .route("/{id}/party-size", put(handler::set_party_size))
        .route("/{id}/grace-period", put(handler::set_grace_period))
}
