//! Queue Entry Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::QueueEntry;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "queue_entry";

#[derive(Clone)]
pub struct QueueEntryRepository {
    base: BaseRepository,
}

impl QueueEntryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find entry by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<QueueEntry>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid entry ID: {}", id)))?;
        let entry: Option<QueueEntry> = self.base.db().select(thing).await?;
        Ok(entry)
    }

    /// All active (waiting/called) entries of a restaurant, position order
    ///
    /// joined_at tie-break is defensive; positions are dense by invariant.
    pub async fn find_active(&self, restaurant: &RecordId) -> RepoResult<Vec<QueueEntry>> {
        let entries: Vec<QueueEntry> = self
            .base
            .db()
            .query(
                "SELECT * FROM queue_entry \
                 WHERE restaurant = $restaurant AND status IN ['waiting', 'called'] \
                 ORDER BY position ASC, joined_at ASC",
            )
            .bind(("restaurant", restaurant.clone()))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// Active, ready-to-return entries whose grace deadline has passed
    pub async fn find_grace_expired(&self, now_millis: i64) -> RepoResult<Vec<QueueEntry>> {
        let entries: Vec<QueueEntry> = self
            .base
            .db()
            .query(
                "SELECT * FROM queue_entry \
                 WHERE status IN ['waiting', 'called'] \
                 AND ready_to_return = true \
                 AND grace_period_expiry != NONE \
                 AND grace_period_expiry < $now",
            )
            .bind(("now", now_millis))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// Create a new queue entry
    pub async fn create(&self, entry: QueueEntry) -> RepoResult<QueueEntry> {
        let created: Option<QueueEntry> = self.base.db().create(TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create queue entry".to_string()))
    }

    /// Persist the full entry record
    pub async fn update(&self, entry: &QueueEntry) -> RepoResult<QueueEntry> {
        let id = entry
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Entry has no ID".to_string()))?;
        let updated: Option<QueueEntry> =
            self.base.db().update(id).content(entry.clone()).await?;
        updated.ok_or_else(|| RepoError::NotFound("Queue entry not found".to_string()))
    }
}
