//! 认证模块 - JWT 校验与店主权限门控
//!
//! 账号与登录由外部身份提供方负责，本模块只验证令牌并决定
//! 当前主体是否有权操作某家餐厅的策略。

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};

use crate::db::models::Restaurant;
use crate::utils::AppError;

/// 店主门控：当前主体必须拥有该餐厅
///
/// 令牌中的 `restaurant_id` 或餐厅记录上的 `owner_id` 任一匹配即通过。
pub fn ensure_owner(user: &CurrentUser, restaurant: &Restaurant) -> Result<(), AppError> {
    let id = restaurant.id_string();
    if user.restaurant_id.as_deref() == Some(id.as_str()) {
        return Ok(());
    }
    if restaurant.owner_id.as_deref() == Some(user.id.as_str()) {
        return Ok(());
    }
    Err(AppError::forbidden(format!(
        "Principal {} does not own {}",
        user.id, id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(owner: Option<&str>) -> Restaurant {
        Restaurant {
            id: Some(surrealdb::RecordId::from_table_key("restaurant", "r1")),
            name: "Kopitiam".to_string(),
            cuisine: String::new(),
            address: String::new(),
            location: None,
            owner_id: owner.map(str::to_string),
            queue_paused: false,
            last_paused_at: None,
            min_party_size: 1,
            max_party_size: 20,
            notification_timer: 10,
            queue_length: 0,
            current_wait_time: 0,
            created_at: None,
        }
    }

    #[test]
    fn owner_id_match_passes() {
        let user = CurrentUser {
            id: "owner-1".to_string(),
            restaurant_id: None,
        };
        assert!(ensure_owner(&user, &restaurant(Some("owner-1"))).is_ok());
    }

    #[test]
    fn claims_binding_match_passes() {
        let user = CurrentUser {
            id: "someone".to_string(),
            restaurant_id: Some("restaurant:r1".to_string()),
        };
        assert!(ensure_owner(&user, &restaurant(Some("owner-1"))).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let user = CurrentUser {
            id: "stranger".to_string(),
            restaurant_id: Some("restaurant:other".to_string()),
        };
        assert!(matches!(
            ensure_owner(&user, &restaurant(Some("owner-1"))),
            Err(AppError::Forbidden(_))
        ));
    }
}
