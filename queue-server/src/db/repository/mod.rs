//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod queue_entry;
pub mod restaurant;

// Re-exports
pub use queue_entry::QueueEntryRepository;
pub use restaurant::RestaurantRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "queue_entry:abc".parse()?;
//   - CRUD: db.select(id) / db.update(id) 直接使用 RecordId
// =============================================================================

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
