//! Database Module
//!
//! 嵌入式 SurrealDB 存储。生产环境使用 RocksDb 引擎，
//! 测试使用 Mem 引擎 (见 `open_in_memory`)。

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "queueline";
const DATABASE: &str = "main";

/// 打开磁盘数据库并选择 namespace/database
pub async fn open(path: impl AsRef<Path>) -> Result<Surreal<Db>, AppError> {
    let db: Surreal<Db> = Surreal::new::<RocksDb>(path.as_ref())
        .await
        .map_err(|e| AppError::store_unavailable(format!("Failed to open database: {e}")))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::store_unavailable(format!("Failed to select ns/db: {e}")))?;

    tracing::info!("Database opened (SurrealDB embedded, RocksDB backend)");
    Ok(db)
}

/// 打开内存数据库 (测试用)
pub async fn open_in_memory() -> Result<Surreal<Db>, AppError> {
    use surrealdb::engine::local::Mem;

    let db: Surreal<Db> = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::store_unavailable(format!("Failed to open memory db: {e}")))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::store_unavailable(format!("Failed to select ns/db: {e}")))?;

    Ok(db)
}
