//! Restaurant Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Restaurant, RestaurantCreate};
use crate::utils::time;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "restaurant";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All restaurants ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query("SELECT * FROM restaurant ORDER BY name")
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    /// Find restaurant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid restaurant ID: {}", id)))?;
        let restaurant: Option<Restaurant> = self.base.db().select(thing).await?;
        Ok(restaurant)
    }

    /// Create a new restaurant with policy defaults applied
    pub async fn create(&self, data: RestaurantCreate, owner_id: &str) -> RepoResult<Restaurant> {
        let restaurant = Restaurant {
            id: None,
            name: data.name,
            cuisine: data.cuisine,
            address: data.address,
            location: data.location,
            owner_id: Some(owner_id.to_string()),
            queue_paused: false,
            last_paused_at: None,
            min_party_size: data.min_party_size.unwrap_or(1),
            max_party_size: data.max_party_size.unwrap_or(20),
            notification_timer: data.notification_timer.unwrap_or(10),
            queue_length: 0,
            current_wait_time: 0,
            created_at: Some(time::now_millis()),
        };

        let created: Option<Restaurant> = self.base.db().create(TABLE).content(restaurant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// Persist the full restaurant record
    pub async fn update(&self, restaurant: &Restaurant) -> RepoResult<Restaurant> {
        let id = restaurant
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Restaurant has no ID".to_string()))?;
        let updated: Option<Restaurant> = self
            .base
            .db()
            .update(id)
            .content(restaurant.clone())
            .await?;
        updated.ok_or_else(|| RepoError::NotFound("Restaurant not found".to_string()))
    }
}
