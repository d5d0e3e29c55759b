//! 重启存活测试
//!
//! 宽限期到期时间是持久化的绝对时间戳：进程重启后不依赖任何
//! 内存定时器，重新打开数据库即可继续判定过期并补上跳过转换。

use std::sync::Arc;

use queue_server::db;
use queue_server::db::models::RestaurantCreate;
use queue_server::db::repository::{QueueEntryRepository, RestaurantRepository};
use queue_server::queue::JoinRequest;
use queue_server::{MessageBus, QueueEngine};
use shared::models::EntryStatus;

fn engine_over(db: surrealdb::Surreal<surrealdb::engine::local::Db>) -> Arc<QueueEngine> {
    Arc::new(QueueEngine::new(
        db,
        MessageBus::new(),
        chrono_tz::Asia::Singapore,
    ))
}

#[tokio::test]
async fn grace_deadline_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("queueline.db");

    // First process lifetime: join, call, then "crash" before the sweeper runs
    let (restaurant_id, entry_id) = {
        let db = db::open(&db_path).await.unwrap();
        let restaurant = RestaurantRepository::new(db.clone())
            .create(
                RestaurantCreate {
                    name: "Lau Pa Sat".to_string(),
                    cuisine: "Hawker".to_string(),
                    address: "18 Raffles Quay".to_string(),
                    location: None,
                    min_party_size: None,
                    max_party_size: None,
                    notification_timer: None,
                },
                "owner-1",
            )
            .await
            .unwrap();
        let rid = restaurant.id_string();

        let engine = engine_over(db.clone());
        engine
            .join(JoinRequest {
                restaurant_id: rid.clone(),
                customer_name: "Alice".to_string(),
                party_size: 2,
                phone_number: None,
                is_walk_in: false,
            })
            .await
            .unwrap();
        let mut called = engine.call_next(&rid).await.unwrap();
        let entry_id = called.id_string();

        // Window already elapsed when the process dies
        called.grace_period_expiry = Some(queue_server::utils::time::now_millis() - 1);
        QueueEntryRepository::new(db.clone())
            .update(&called)
            .await
            .unwrap();

        (rid, entry_id)
        // db handle dropped here, releasing the store
    };

    // Second process lifetime: the startup sweep materializes the skip
    let db = db::open(&db_path).await.unwrap();
    let engine = engine_over(db);

    assert_eq!(engine.sweep_expired().await, 1);

    let entry = engine.get_entry(&entry_id).await.unwrap();
    assert_eq!(entry.status, EntryStatus::Skipped);
    assert!(engine.waiting_list(&restaurant_id).await.unwrap().is_empty());
}
