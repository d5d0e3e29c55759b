//! QueueEngine - Queue ordering and admission engine
//!
//! This module handles:
//! - Join validation against restaurant policy (pause, party size)
//! - Position assignment (strict FIFO, walk-ins and online joins share
//!   one ordering track)
//! - The call / admit / remove / cancel / skip transitions
//! - Renumbering and wait re-estimation after any membership change
//! - Derived cache maintenance (queue_length, current_wait_time)
//! - Snapshot broadcasting via the message bus
//!
//! # Operation flow
//!
//! ```text
//! operation(...)
//!     ├─ 1. Acquire the per-restaurant critical section
//!     ├─ 2. Read current state (restaurant + active entries)
//!     ├─ 3. Validate preconditions (abort whole op, no partial write)
//!     ├─ 4. Mutate entry / reorder remaining entries
//!     ├─ 5. Recompute derived caches on the restaurant record
//!     └─ 6. Publish one full snapshot to the bus
//! ```
//!
//! Two concurrent joins can never receive the same position, and a remove
//! racing a join can never leave gaps: every read-modify-write runs inside
//! the restaurant's mutex, and list reads take the same mutex so no reader
//! observes a partially renumbered queue.

mod error;
pub use error::*;

use std::sync::Arc;

use chrono_tz::Tz;
use dashmap::DashMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use tokio::sync::Mutex;

use crate::db::models::{QueueEntry, Restaurant};
use crate::db::repository::{QueueEntryRepository, RestaurantRepository};
use crate::message::MessageBus;
use crate::queue::estimate;
use crate::utils::time;
use shared::message::{BusMessage, EntrySyncPayload, QueueSnapshotPayload, RestaurantSyncPayload};
use shared::models::{EntryStatus, QueueEntrySnapshot, RestaurantSnapshot};

/// Positions at or below this are flagged `near_front` in snapshots
pub const NEAR_FRONT_THRESHOLD: u32 = 3;

/// Party-size policy hard cap
const PARTY_SIZE_CAP: u32 = 50;

/// Grace period bounds, minutes
const GRACE_PERIOD_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

/// Join request (online diners and staff walk-ins share this path)
#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub restaurant_id: String,
    pub customer_name: String,
    pub party_size: u32,
    pub phone_number: Option<String>,
    pub is_walk_in: bool,
}

/// Queue ordering engine
///
/// One instance serves all restaurants; mutual exclusion is scoped per
/// restaurant so queues never contend with each other.
pub struct QueueEngine {
    entries: QueueEntryRepository,
    restaurants: RestaurantRepository,
    bus: MessageBus,
    /// 业务时区 (高峰时段判断)
    tz: Tz,
    /// Per-restaurant critical sections
    locks: DashMap<String, Arc<Mutex<()>>>,
    /// Per-restaurant snapshot versions, monotonically increasing
    versions: DashMap<String, u64>,
}

impl std::fmt::Debug for QueueEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueEngine")
            .field("tz", &self.tz)
            .field("restaurants_locked", &self.locks.len())
            .finish()
    }
}

impl QueueEngine {
    /// Create an engine over an explicit store handle (no ambient global)
    pub fn new(db: Surreal<Db>, bus: MessageBus, tz: Tz) -> Self {
        Self {
            entries: QueueEntryRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db),
            bus,
            tz,
            locks: DashMap::new(),
            versions: DashMap::new(),
        }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Join a restaurant's queue, appending at the tail (FIFO)
    ///
    /// Walk-ins are physically present: they enter already ready-to-return
    /// with notified_at set, skipping the call/return cycle.
    pub async fn join(&self, req: JoinRequest) -> QueueResult<QueueEntry> {
        let rid = restaurant_record_id(&req.restaurant_id)?;
        let lock = self.lock_for(&rid);
        let _guard = lock.lock().await;

        let mut restaurant = self.load_restaurant(&rid).await?;

        if restaurant.queue_paused {
            return Err(QueueError::QueuePaused);
        }
        if !restaurant.accepts_party_size(req.party_size) {
            return Err(QueueError::InvalidPartySize {
                party_size: req.party_size,
                min: restaurant.min_party_size,
                max: restaurant.max_party_size,
            });
        }

        let active = self.entries.find_active(&rid).await?;
        let position = active.len() as u32 + 1;
        let est = estimate::estimate(position);
        let now = time::now_millis();

        let entry = QueueEntry {
            id: None,
            restaurant: rid.clone(),
            customer_name: req.customer_name,
            phone_number: req.phone_number,
            party_size: req.party_size,
            position,
            estimated_wait_time: est.expected,
            wait_time_range: est.range(),
            status: EntryStatus::Waiting,
            is_walk_in: req.is_walk_in,
            joined_at: now,
            notified_at: req.is_walk_in.then_some(now),
            notification_sent: req.is_walk_in,
            ready_to_return: req.is_walk_in,
            grace_period_expiry: None,
        };
        let entry = self.entries.create(entry).await?;

        restaurant.queue_length = position;
        restaurant.current_wait_time = est.expected;
        let restaurant = self.restaurants.update(&restaurant).await?;

        let mut snapshot_entries = active;
        snapshot_entries.push(entry.clone());
        self.publish_queue_snapshot(&rid, &snapshot_entries);
        self.publish_restaurant(&restaurant);

        tracing::info!(
            restaurant = %rid,
            entry = %entry.id_string(),
            position,
            walk_in = entry.is_walk_in,
            "Party joined queue"
        );
        Ok(entry)
    }

    /// Call the party at the head of the queue
    ///
    /// The entry stays in the active set at position 1 until it is seated,
    /// skipped or cancelled. Calling starts the grace window using the
    /// restaurant's configured notification timer.
    pub async fn call_next(&self, restaurant_id: &str) -> QueueResult<QueueEntry> {
        let rid = restaurant_record_id(restaurant_id)?;
        let lock = self.lock_for(&rid);
        let _guard = lock.lock().await;

        let restaurant = self.load_restaurant(&rid).await?;
        let active = self.entries.find_active(&rid).await?;
        let Some(head) = active.into_iter().next() else {
            return Err(QueueError::EmptyQueue);
        };

        let entry = self
            .start_grace(head, restaurant.notification_timer)
            .await?;

        let snapshot_entries = self.entries.find_active(&rid).await?;
        self.publish_queue_snapshot(&rid, &snapshot_entries);

        tracing::info!(
            restaurant = %rid,
            entry = %entry.id_string(),
            grace_minutes = restaurant.notification_timer,
            "Called next party"
        );
        Ok(entry)
    }

    /// Mark a specific entry ready-to-return and start its grace window
    ///
    /// `grace_minutes` defaults to the restaurant's notification timer.
    pub async fn mark_ready_to_return(
        &self,
        entry_id: &str,
        grace_minutes: Option<u32>,
    ) -> QueueResult<QueueEntry> {
        let found = self.require_entry(entry_id).await?;
        let rid = found.restaurant.clone();
        let lock = self.lock_for(&rid);
        let _guard = lock.lock().await;

        // Re-read under the lock
        let entry = self.require_entry(entry_id).await?;
        if entry.status.is_terminal() {
            return Err(QueueError::InvalidTransition {
                from: entry.status,
                op: "notify",
            });
        }

        let minutes = match grace_minutes {
            Some(m) => {
                if !GRACE_PERIOD_RANGE.contains(&m) {
                    return Err(QueueError::InvalidRange(format!(
                        "Grace period must be between {} and {} minutes, got {}",
                        GRACE_PERIOD_RANGE.start(),
                        GRACE_PERIOD_RANGE.end(),
                        m
                    )));
                }
                m
            }
            None => self.load_restaurant(&rid).await?.notification_timer,
        };

        let entry = self.start_grace(entry, minutes).await?;

        let snapshot_entries = self.entries.find_active(&rid).await?;
        self.publish_queue_snapshot(&rid, &snapshot_entries);
        Ok(entry)
    }

    /// Seat the party (terminal: seated)
    pub async fn admit(&self, entry_id: &str) -> QueueResult<QueueEntry> {
        self.finalize(entry_id, EntryStatus::Seated, "admit").await
    }

    /// Staff-initiated removal (terminal: cancelled)
    pub async fn remove(&self, entry_id: &str) -> QueueResult<QueueEntry> {
        self.finalize(entry_id, EntryStatus::Cancelled, "remove")
            .await
    }

    /// Customer-facing cancellation; same effect as [`remove`](Self::remove)
    pub async fn cancel(&self, entry_id: &str) -> QueueResult<QueueEntry> {
        self.finalize(entry_id, EntryStatus::Cancelled, "cancel")
            .await
    }

    /// Skip the party (grace expired or staff forces it; terminal: skipped)
    pub async fn skip(&self, entry_id: &str) -> QueueResult<QueueEntry> {
        self.finalize(entry_id, EntryStatus::Skipped, "skip").await
    }

    /// Atomic read of a restaurant's active queue, position order
    pub async fn waiting_list(&self, restaurant_id: &str) -> QueueResult<Vec<QueueEntry>> {
        let rid = restaurant_record_id(restaurant_id)?;
        let lock = self.lock_for(&rid);
        let _guard = lock.lock().await;
        Ok(self.entries.find_active(&rid).await?)
    }

    /// Fetch one entry, lazily materializing an elapsed grace window
    ///
    /// A reader comparing now against the persisted expiry must treat the
    /// entry as skipped even if no sweeper has run yet; rather than lying
    /// about the stored status, the transition is materialized here.
    pub async fn get_entry(&self, entry_id: &str) -> QueueResult<QueueEntry> {
        let entry = self.require_entry(entry_id).await?;
        if entry.grace_expired(time::now_millis()) {
            return self.skip(entry_id).await;
        }
        Ok(entry)
    }

    /// Skip every entry whose grace window has elapsed; returns the count
    ///
    /// Called periodically by [`GraceSweeper`](crate::queue::GraceSweeper).
    /// Races with the lazy path are harmless: `finalize` re-checks
    /// terminality under the restaurant lock, so the transition fires once.
    pub async fn sweep_expired(&self) -> usize {
        let now = time::now_millis();
        let expired = match self.entries.find_grace_expired(now).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Grace sweep query failed");
                return 0;
            }
        };

        let mut skipped = 0;
        for entry in expired {
            let id = entry.id_string();
            match self.skip(&id).await {
                Ok(_) => {
                    skipped += 1;
                    tracing::info!(entry = %id, "Grace period expired, party skipped");
                }
                // Lost the race to a concurrent admit/cancel/lazy skip
                Err(QueueError::InvalidTransition { .. }) | Err(QueueError::NotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(entry = %id, error = %e, "Failed to skip expired entry");
                }
            }
        }
        skipped
    }

    // ========================================================================
    // Policy operations (write-boundary validation)
    // ========================================================================

    /// Pause or resume the queue
    pub async fn set_pause(&self, restaurant_id: &str, paused: bool) -> QueueResult<Restaurant> {
        self.update_policy(restaurant_id, |r| {
            r.queue_paused = paused;
            r.last_paused_at = paused.then(time::now_millis);
            Ok(())
        })
        .await
    }

    /// Update party-size bounds
    pub async fn set_party_size_limits(
        &self,
        restaurant_id: &str,
        min: u32,
        max: u32,
    ) -> QueueResult<Restaurant> {
        if min < 1 || max > PARTY_SIZE_CAP || min > max {
            return Err(QueueError::InvalidRange(format!(
                "Party size limits must satisfy 1 <= min <= max <= {}, got min={} max={}",
                PARTY_SIZE_CAP, min, max
            )));
        }
        self.update_policy(restaurant_id, |r| {
            r.min_party_size = min;
            r.max_party_size = max;
            Ok(())
        })
        .await
    }

    /// Update the grace-period duration (minutes)
    pub async fn set_grace_period(
        &self,
        restaurant_id: &str,
        minutes: u32,
    ) -> QueueResult<Restaurant> {
        if !GRACE_PERIOD_RANGE.contains(&minutes) {
            return Err(QueueError::InvalidRange(format!(
                "Grace period must be between {} and {} minutes, got {}",
                GRACE_PERIOD_RANGE.start(),
                GRACE_PERIOD_RANGE.end(),
                minutes
            )));
        }
        self.update_policy(restaurant_id, |r| {
            r.notification_timer = minutes;
            Ok(())
        })
        .await
    }

    // ========================================================================
    // Snapshot conversion
    // ========================================================================

    /// Wire snapshot of one entry
    pub fn entry_snapshot(&self, entry: &QueueEntry) -> QueueEntrySnapshot {
        entry.to_snapshot(time::now_millis(), NEAR_FRONT_THRESHOLD)
    }

    /// Wire snapshot of a restaurant, with derived display fields
    pub fn restaurant_snapshot(&self, restaurant: &Restaurant) -> RestaurantSnapshot {
        let intensity =
            estimate::queue_intensity(restaurant.queue_length, restaurant.current_wait_time);
        RestaurantSnapshot {
            id: restaurant.id_string(),
            name: restaurant.name.clone(),
            cuisine: restaurant.cuisine.clone(),
            address: restaurant.address.clone(),
            location: restaurant.location,
            queue_paused: restaurant.queue_paused,
            min_party_size: restaurant.min_party_size,
            max_party_size: restaurant.max_party_size,
            notification_timer: restaurant.notification_timer,
            queue_length: restaurant.queue_length,
            current_wait_time: restaurant.current_wait_time,
            queue_intensity: intensity,
            intensity_tier: estimate::intensity_tier(intensity),
            is_peak_hours: estimate::is_peak_hours(chrono::Utc::now(), self.tz),
        }
    }

    /// Publish a restaurant record to the bus (also used after creation)
    pub fn publish_restaurant(&self, restaurant: &Restaurant) {
        let id = restaurant.id_string();
        let version = self.next_version(&format!("restaurant/{id}"));
        let payload = RestaurantSyncPayload {
            id,
            version,
            restaurant: self.restaurant_snapshot(restaurant),
        };
        self.bus.publish(BusMessage::restaurant_sync(&payload));
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn lock_for(&self, rid: &RecordId) -> Arc<Mutex<()>> {
        self.locks
            .entry(rid.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn next_version(&self, key: &str) -> u64 {
        let mut entry = self.versions.entry(key.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    async fn load_restaurant(&self, rid: &RecordId) -> QueueResult<Restaurant> {
        self.restaurants
            .find_by_id(&rid.to_string())
            .await?
            .ok_or_else(|| QueueError::NotFound(format!("Restaurant {} not found", rid)))
    }

    async fn require_entry(&self, entry_id: &str) -> QueueResult<QueueEntry> {
        self.entries
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| QueueError::NotFound(format!("Queue entry {} not found", entry_id)))
    }

    /// waiting → called with a fresh grace window (assumes lock held)
    async fn start_grace(&self, mut entry: QueueEntry, minutes: u32) -> QueueResult<QueueEntry> {
        let now = time::now_millis();
        entry.status = EntryStatus::Called;
        entry.notified_at = Some(now);
        entry.notification_sent = true;
        entry.ready_to_return = true;
        entry.grace_period_expiry = Some(now + i64::from(minutes) * 60_000);
        Ok(self.entries.update(&entry).await?)
    }

    /// Move an entry to a terminal state, renumber the remainder, refresh
    /// caches and publish one snapshot
    async fn finalize(
        &self,
        entry_id: &str,
        target: EntryStatus,
        op: &'static str,
    ) -> QueueResult<QueueEntry> {
        let found = self.require_entry(entry_id).await?;
        let rid = found.restaurant.clone();
        let lock = self.lock_for(&rid);
        let _guard = lock.lock().await;

        // Re-read under the lock; transitions are one-directional
        let mut entry = self.require_entry(entry_id).await?;
        if entry.status.is_terminal() {
            return Err(QueueError::InvalidTransition {
                from: entry.status,
                op,
            });
        }

        entry.status = target;
        let entry = self.entries.update(&entry).await?;

        let mut restaurant = self.load_restaurant(&rid).await?;
        let remaining = self.reorder(&rid, &mut restaurant).await?;
        let restaurant = self.restaurants.update(&restaurant).await?;

        self.publish_queue_snapshot(&rid, &remaining);
        self.publish_restaurant(&restaurant);
        self.bus.publish(BusMessage::entry_sync(
            &rid.to_string(),
            &EntrySyncPayload {
                entry: self.entry_snapshot(&entry),
            },
        ));

        tracing::info!(
            restaurant = %rid,
            entry = %entry.id_string(),
            status = %target,
            "Entry left the queue"
        );
        Ok(entry)
    }

    /// Renumber active entries to a dense 1..N and re-estimate each wait
    /// from its new position. Caches follow the new tail. Assumes lock held;
    /// the snapshot is published only after every write lands.
    async fn reorder(
        &self,
        rid: &RecordId,
        restaurant: &mut Restaurant,
    ) -> QueueResult<Vec<QueueEntry>> {
        let mut active = self.entries.find_active(rid).await?;

        for (idx, entry) in active.iter_mut().enumerate() {
            let position = idx as u32 + 1;
            let est = estimate::estimate(position);
            if entry.position != position || entry.estimated_wait_time != est.expected {
                entry.position = position;
                entry.estimated_wait_time = est.expected;
                entry.wait_time_range = est.range();
                *entry = self.entries.update(entry).await?;
            }
        }

        let len = active.len() as u32;
        restaurant.queue_length = len;
        restaurant.current_wait_time = if len > 0 {
            estimate::estimate(len).expected
        } else {
            0
        };

        Ok(active)
    }

    /// Load → apply → persist → publish, inside the restaurant's mutex
    async fn update_policy<F>(&self, restaurant_id: &str, apply: F) -> QueueResult<Restaurant>
    where
        F: FnOnce(&mut Restaurant) -> QueueResult<()>,
    {
        let rid = restaurant_record_id(restaurant_id)?;
        let lock = self.lock_for(&rid);
        let _guard = lock.lock().await;

        let mut restaurant = self.load_restaurant(&rid).await?;
        apply(&mut restaurant)?;
        let restaurant = self.restaurants.update(&restaurant).await?;

        self.publish_restaurant(&restaurant);
        tracing::info!(restaurant = %rid, "Restaurant policy updated");
        Ok(restaurant)
    }

    fn publish_queue_snapshot(&self, rid: &RecordId, entries: &[QueueEntry]) {
        let restaurant_id = rid.to_string();
        let version = self.next_version(&format!("queue/{restaurant_id}"));
        let now = time::now_millis();
        let payload = QueueSnapshotPayload {
            restaurant_id,
            version,
            entries: entries
                .iter()
                .map(|e| e.to_snapshot(now, NEAR_FRONT_THRESHOLD))
                .collect(),
        };
        self.bus.publish(BusMessage::queue_sync(&payload));
    }
}

/// Accept both "restaurant:xyz" and bare "xyz" forms
fn restaurant_record_id(id: &str) -> QueueResult<RecordId> {
    if id.contains(':') {
        id.parse()
            .map_err(|_| QueueError::NotFound(format!("Invalid restaurant ID: {}", id)))
    } else {
        Ok(RecordId::from_table_key("restaurant", id))
    }
}

#[cfg(test)]
mod tests;
