//! Queue Entry Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use shared::models::{EntryStatus, QueueEntrySnapshot, WaitTimeRange};

/// Queue entry entity (排队条目)
///
/// `position` is the 1-based dense rank among active (waiting/called)
/// entries of the same restaurant. Terminal entries keep their last
/// position for history but are excluded from the active ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning restaurant
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub customer_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub party_size: u32,
    pub position: u32,
    pub estimated_wait_time: u32,
    pub wait_time_range: WaitTimeRange,
    pub status: EntryStatus,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_walk_in: bool,
    /// Unix millis, immutable after creation
    pub joined_at: i64,
    #[serde(default)]
    pub notified_at: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub notification_sent: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub ready_to_return: bool,
    /// Absolute grace deadline, Unix millis. Persisted so expiry survives
    /// process restarts; never an in-memory-only countdown.
    #[serde(default)]
    pub grace_period_expiry: Option<i64>,
}

impl QueueEntry {
    /// "table:id" form of the entry id, empty string before creation
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// Grace window has elapsed without the party being admitted
    pub fn grace_expired(&self, now_millis: i64) -> bool {
        self.status.is_active()
            && self.ready_to_return
            && self
                .grace_period_expiry
                .is_some_and(|expiry| now_millis > expiry)
    }

    /// Status as any reader must interpret it at `now`
    ///
    /// An entry whose grace window has lapsed is logically skipped even if
    /// the stored status field has not been materialized yet.
    pub fn effective_status(&self, now_millis: i64) -> EntryStatus {
        if self.grace_expired(now_millis) {
            EntryStatus::Skipped
        } else {
            self.status
        }
    }

    /// Wire snapshot; `near_front_threshold` is the display hint boundary
    pub fn to_snapshot(&self, now_millis: i64, near_front_threshold: u32) -> QueueEntrySnapshot {
        let status = self.effective_status(now_millis);
        QueueEntrySnapshot {
            id: self.id_string(),
            restaurant_id: self.restaurant.to_string(),
            customer_name: self.customer_name.clone(),
            party_size: self.party_size,
            position: self.position,
            estimated_wait_time: self.estimated_wait_time,
            wait_time_range: self.wait_time_range,
            status,
            is_walk_in: self.is_walk_in,
            joined_at: self.joined_at,
            notified_at: self.notified_at,
            ready_to_return: self.ready_to_return,
            grace_period_expiry: self.grace_period_expiry,
            near_front: status.is_active() && self.position <= near_front_threshold,
        }
    }
}
