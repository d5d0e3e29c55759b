//! Queue API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::{CurrentUser, ensure_owner};
use crate::core::ServerState;
use crate::db::repository::{QueueEntryRepository, RestaurantRepository};
use crate::queue::JoinRequest;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResponse, AppResult, ok, validation};
use shared::models::QueueEntrySnapshot;

fn full_restaurant_id(id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("restaurant:{id}")
    }
}

fn full_entry_id(id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("queue_entry:{id}")
    }
}

/// 店主门控：主体必须拥有该条目所属的餐厅
async fn ensure_entry_owner(
    state: &ServerState,
    user: &CurrentUser,
    entry_id: &str,
) -> AppResult<()> {
    let entry = QueueEntryRepository::new(state.get_db())
        .find_by_id(&full_entry_id(entry_id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Queue entry {} not found", entry_id)))?;
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&entry.restaurant.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", entry.restaurant)))?;
    ensure_owner(user, &restaurant)
}

async fn ensure_restaurant_owner(
    state: &ServerState,
    user: &CurrentUser,
    restaurant_id: &str,
) -> AppResult<()> {
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&full_restaurant_id(restaurant_id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", restaurant_id)))?;
    ensure_owner(user, &restaurant)
}

/// GET /api/restaurants/{id}/queue - 当前等待列表 (按 position 升序)
pub async fn waiting_list(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<QueueEntrySnapshot>>>> {
    let entries = state.engine.waiting_list(&full_restaurant_id(&id)).await?;
    let snapshots = entries
        .iter()
        .map(|e| state.engine.entry_snapshot(e))
        .collect();
    Ok(ok(snapshots))
}

#[derive(Debug, Deserialize)]
pub struct JoinPayload {
    pub customer_name: String,
    pub party_size: u32,
    pub phone_number: Option<String>,
    /// 到店顾客 (店员代录)，直接进入 ready_to_return 状态
    #[serde(default)]
    pub is_walk_in: bool,
}

/// POST /api/restaurants/{id}/queue - 入队
pub async fn join(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<JoinPayload>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    validation::validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;

    let entry = state
        .engine
        .join(JoinRequest {
            restaurant_id: full_restaurant_id(&id),
            customer_name: payload.customer_name,
            party_size: payload.party_size,
            phone_number: payload.phone_number,
            is_walk_in: payload.is_walk_in,
        })
        .await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}

/// POST /api/restaurants/{id}/queue/call-next - 叫号队首 (店主)
pub async fn call_next(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    ensure_restaurant_owner(&state, &user, &id).await?;
    let entry = state.engine.call_next(&full_restaurant_id(&id)).await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}

/// GET /api/queue/{entry_id} - 条目状态
///
/// 宽限期已过的条目在这里直接报告 skipped (lazy 物化)。
pub async fn get_entry(
    State(state): State<ServerState>,
    Path(entry_id): Path<String>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    let entry = state.engine.get_entry(&full_entry_id(&entry_id)).await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}

#[derive(Debug, Deserialize, Default)]
pub struct NotifyPayload {
    /// 缺省使用餐厅配置的 notification_timer
    pub grace_minutes: Option<u32>,
}

/// POST /api/queue/{entry_id}/notify - 通知返回并开启宽限期 (店主)
pub async fn notify(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(entry_id): Path<String>,
    payload: Option<Json<NotifyPayload>>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    ensure_entry_owner(&state, &user, &entry_id).await?;
    let grace_minutes = payload.and_then(|Json(p)| p.grace_minutes);
    let entry = state
        .engine
        .mark_ready_to_return(&full_entry_id(&entry_id), grace_minutes)
        .await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}

/// POST /api/queue/{entry_id}/admit - 入座 (店主)
pub async fn admit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(entry_id): Path<String>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    ensure_entry_owner(&state, &user, &entry_id).await?;
    let entry = state.engine.admit(&full_entry_id(&entry_id)).await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}

/// POST /api/queue/{entry_id}/remove - 移除 (店主)
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(entry_id): Path<String>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    ensure_entry_owner(&state, &user, &entry_id).await?;
    let entry = state.engine.remove(&full_entry_id(&entry_id)).await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}

/// POST /api/queue/{entry_id}/skip - 跳过 (店主)
pub async fn skip(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(entry_id): Path<String>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    ensure_entry_owner(&state, &user, &entry_id).await?;
    let entry = state.engine.skip(&full_entry_id(&entry_id)).await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}

/// POST /api/queue/{entry_id}/cancel - 顾客取消 (无需认证)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(entry_id): Path<String>,
) -> AppResult<Json<AppResponse<QueueEntrySnapshot>>> {
    let entry = state.engine.cancel(&full_entry_id(&entry_id)).await?;
    Ok(ok(state.engine.entry_snapshot(&entry)))
}
