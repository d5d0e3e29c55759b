//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{CurrentUser, ensure_owner};
use crate::core::ServerState;
use crate::db::models::{Restaurant, RestaurantCreate};
use crate::db::repository::RestaurantRepository;
use crate::utils::{AppError, AppResponse, AppResult, geo, ok};
use shared::models::{GeoPoint, RestaurantSnapshot};

/// "restaurant:xyz" 或裸 id 均接受
fn full_id(id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("restaurant:{id}")
    }
}

async fn load_owned(
    state: &ServerState,
    user: &CurrentUser,
    id: &str,
) -> AppResult<Restaurant> {
    let repo = RestaurantRepository::new(state.get_db());
    let restaurant = repo
        .find_by_id(&full_id(id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;
    ensure_owner(user, &restaurant)?;
    Ok(restaurant)
}

/// GET /api/restaurants - 全部餐厅 (按名称排序)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<RestaurantSnapshot>>>> {
    let restaurants = RestaurantRepository::new(state.get_db()).find_all().await?;
    let snapshots = restaurants
        .iter()
        .map(|r| state.engine.restaurant_snapshot(r))
        .collect();
    Ok(ok(snapshots))
}

/// GET /api/restaurants/{id} - 单个餐厅快照
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<RestaurantSnapshot>>> {
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&full_id(&id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;
    Ok(ok(state.engine.restaurant_snapshot(&restaurant)))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    /// 默认 10 km
    pub radius_km: Option<f64>,
}

/// GET /api/restaurants/nearby?lat=..&lng=..&radius_km=.. - 半径内餐厅
///
/// 纯过滤，不按距离排序 (列表保持名称序)。
pub async fn nearby(
    State(state): State<ServerState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<AppResponse<Vec<RestaurantSnapshot>>>> {
    let center = GeoPoint {
        lat: query.lat,
        lng: query.lng,
    };
    let radius_km = query.radius_km.unwrap_or(10.0);
    if !(0.0..=20_000.0).contains(&radius_km) {
        return Err(AppError::validation(format!(
            "radius_km must be between 0 and 20000, got {radius_km}"
        )));
    }

    let restaurants = RestaurantRepository::new(state.get_db()).find_all().await?;
    let snapshots = restaurants
        .iter()
        .filter(|r| {
            r.location
                .is_some_and(|loc| geo::within_radius(center, loc, radius_km))
        })
        .map(|r| state.engine.restaurant_snapshot(r))
        .collect();
    Ok(ok(snapshots))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRestaurantPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub cuisine: String,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[validate(range(min = 1, max = 50))]
    pub min_party_size: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub max_party_size: Option<u32>,
    #[validate(range(min = 1, max = 60))]
    pub notification_timer: Option<u32>,
}

/// POST /api/restaurants - 注册餐厅 (创建者成为店主)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateRestaurantPayload>,
) -> AppResult<Json<AppResponse<RestaurantSnapshot>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if let (Some(min), Some(max)) = (payload.min_party_size, payload.max_party_size)
        && min > max
    {
        return Err(AppError::validation(format!(
            "min_party_size {} exceeds max_party_size {}",
            min, max
        )));
    }

    let restaurant = RestaurantRepository::new(state.get_db())
        .create(
            RestaurantCreate {
                name: payload.name,
                cuisine: payload.cuisine,
                address: payload.address,
                location: payload.location,
                min_party_size: payload.min_party_size,
                max_party_size: payload.max_party_size,
                notification_timer: payload.notification_timer,
            },
            &user.id,
        )
        .await?;

    state.engine.publish_restaurant(&restaurant);

    tracing::info!(
        restaurant = %restaurant.id_string(),
        owner = %user.id,
        "Restaurant registered"
    );
    Ok(ok(state.engine.restaurant_snapshot(&restaurant)))
}

#[derive(Debug, Deserialize)]
pub struct PausePayload {
    pub paused: bool,
}

/// PUT /api/restaurants/{id}/pause - 暂停/恢复排队 (店主)
pub async fn set_pause(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PausePayload>,
) -> AppResult<Json<AppResponse<RestaurantSnapshot>>> {
    load_owned(&state, &user, &id).await?;
    let restaurant = state.engine.set_pause(&full_id(&id), payload.paused).await?;
    Ok(ok(state.engine.restaurant_snapshot(&restaurant)))
}

#[derive(Debug, Deserialize)]
pub struct PartySizePayload {
    pub min: u32,
    pub max: u32,
}

/// PUT /api/restaurants/{id}/party-size - 人数上下限 (店主)
pub async fn set_party_size(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PartySizePayload>,
) -> AppResult<Json<AppResponse<RestaurantSnapshot>>> {
    load_owned(&state, &user, &id).await?;
    let restaurant = state
        .engine
        .set_party_size_limits(&full_id(&id), payload.min, payload.max)
        .await?;
    Ok(ok(state.engine.restaurant_snapshot(&restaurant)))
}

#[derive(Debug, Deserialize)]
pub struct GracePeriodPayload {
    pub minutes: u32,
}

/// PUT /api/restaurants/{id}/grace-period - 宽限期时长 (店主)
pub async fn set_grace_period(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<GracePeriodPayload>,
) -> AppResult<Json<AppResponse<RestaurantSnapshot>>> {
    load_owned(&state, &user, &id).await?;
    let restaurant = state
        .engine
        .set_grace_period(&full_id(&id), payload.minutes)
        .await?;
    Ok(ok(state.engine.restaurant_snapshot(&restaurant)))
}
