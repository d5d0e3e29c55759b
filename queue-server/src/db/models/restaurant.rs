//! Restaurant Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use shared::models::GeoPoint;

fn default_min_party_size() -> u32 {
    1
}

fn default_max_party_size() -> u32 {
    20
}

fn default_notification_timer() -> u32 {
    10
}

/// Restaurant entity — queue owner and policy holder
///
/// `queue_length` and `current_wait_time` are materialized views owned
/// exclusively by the queue engine's mutation path. Staff never write them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// 店主 (外部身份提供方的 principal id)
    #[serde(default)]
    pub owner_id: Option<String>,

    // === Queue policy ===
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub queue_paused: bool,
    #[serde(default)]
    pub last_paused_at: Option<i64>,
    #[serde(default = "default_min_party_size")]
    pub min_party_size: u32,
    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
    /// Grace period minutes granted on call (1-60)
    #[serde(default = "default_notification_timer")]
    pub notification_timer: u32,

    // === Derived caches (engine-owned) ===
    #[serde(default)]
    pub queue_length: u32,
    #[serde(default)]
    pub current_wait_time: u32,

    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Restaurant {
    /// "table:id" form of the restaurant id, empty string before creation
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// Party size falls within the configured bounds
    pub fn accepts_party_size(&self, party_size: u32) -> bool {
        (self.min_party_size..=self.max_party_size).contains(&party_size)
    }
}

/// Create restaurant payload
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub min_party_size: Option<u32>,
    #[serde(default)]
    pub max_party_size: Option<u32>,
    #[serde(default)]
    pub notification_timer: Option<u32>,
}
