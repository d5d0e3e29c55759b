//! Restaurant wire snapshot

use serde::{Deserialize, Serialize};
use std::fmt;

/// WGS84 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Display tier derived from the 0-100 queue intensity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityTier {
    Low,
    Moderate,
    High,
}

impl fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Restaurant record as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSnapshot {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub address: String,
    pub location: Option<GeoPoint>,
    pub queue_paused: bool,
    pub min_party_size: u32,
    pub max_party_size: u32,
    /// Grace period minutes granted when a party is called
    pub notification_timer: u32,
    /// Derived cache: count of active entries
    pub queue_length: u32,
    /// Derived cache: expected wait at the current tail, minutes
    pub current_wait_time: u32,
    /// 0-100 display score
    pub queue_intensity: u32,
    pub intensity_tier: IntensityTier,
    /// Whether local business time is in a peak window right now
    pub is_peak_hours: bool,
}
