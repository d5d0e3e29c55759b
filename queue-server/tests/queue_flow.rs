//! 排队全流程集成测试
//!
//! 使用 ServerState::initialize_in_memory 完整初始化，
//! 覆盖 入队 → 叫号 → 入座 的完整旅程和总线扇出语义。

use queue_server::db::models::RestaurantCreate;
use queue_server::db::repository::RestaurantRepository;
use queue_server::queue::JoinRequest;
use queue_server::{Config, ServerState};
use shared::message::{EventType, QueueSnapshotPayload};
use shared::models::EntryStatus;

async fn setup() -> (ServerState, String) {
    let config = Config::with_overrides("/tmp/queueline-test", 0);
    let state = ServerState::initialize_in_memory(&config).await.unwrap();

    let restaurant = RestaurantRepository::new(state.get_db())
        .create(
            RestaurantCreate {
                name: "Newton Hawker".to_string(),
                cuisine: "Hawker".to_string(),
                address: "500 Clemenceau Ave N".to_string(),
                location: None,
                min_party_size: None,
                max_party_size: None,
                notification_timer: None,
            },
            "owner-1",
        )
        .await
        .unwrap();

    (state, restaurant.id_string())
}

fn join_request(restaurant_id: &str, name: &str) -> JoinRequest {
    JoinRequest {
        restaurant_id: restaurant_id.to_string(),
        customer_name: name.to_string(),
        party_size: 2,
        phone_number: None,
        is_walk_in: false,
    }
}

#[tokio::test]
async fn full_customer_journey() {
    let (state, rid) = setup().await;
    let mut rx = state.bus.subscribe();
    let engine = state.engine.clone();

    let alice = engine.join(join_request(&rid, "Alice")).await.unwrap();
    let bob = engine.join(join_request(&rid, "Bob")).await.unwrap();
    assert_eq!((alice.position, bob.position), (1, 2));

    let called = engine.call_next(&rid).await.unwrap();
    assert_eq!(called.id_string(), alice.id_string());
    assert_eq!(called.status, EntryStatus::Called);
    assert!(called.grace_period_expiry.is_some());

    let seated = engine.admit(&alice.id_string()).await.unwrap();
    assert_eq!(seated.status, EntryStatus::Seated);

    // Bob moved up and was re-estimated
    let list = engine.waiting_list(&rid).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].customer_name, "Bob");
    assert_eq!(list[0].position, 1);
    assert_eq!(list[0].estimated_wait_time, 10);

    // Restaurant caches follow the queue
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&rid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restaurant.queue_length, 1);
    assert_eq!(restaurant.current_wait_time, 10);

    // Bus fan-out: queue snapshots with monotonically increasing versions
    let mut snapshots: Vec<QueueSnapshotPayload> = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        if msg.event_type == EventType::QueueSync {
            snapshots.push(msg.parse_payload().unwrap());
        }
    }
    assert!(snapshots.len() >= 4, "join x2, call, admit");
    for pair in snapshots.windows(2) {
        assert!(pair[0].version < pair[1].version);
    }
    let last = snapshots.last().unwrap();
    assert_eq!(last.entries.len(), 1);
    assert_eq!(last.entries[0].customer_name, "Bob");
    assert!(last.entries[0].near_front);
}

#[tokio::test]
async fn concurrent_joins_get_unique_positions() {
    let (state, rid) = setup().await;
    let engine = state.engine.clone();

    let mut handles = Vec::new();
    for i in 0..20 {
        let engine = engine.clone();
        let rid = rid.clone();
        handles.push(tokio::spawn(async move {
            engine
                .join(join_request(&rid, &format!("Party {i}")))
                .await
                .unwrap()
                .position
        }));
    }

    let mut positions = Vec::new();
    for handle in handles {
        positions.push(handle.await.unwrap());
    }
    positions.sort_unstable();
    assert_eq!(positions, (1..=20).collect::<Vec<u32>>());

    let list = engine.waiting_list(&rid).await.unwrap();
    assert_eq!(list.len(), 20);
    for (idx, entry) in list.iter().enumerate() {
        assert_eq!(entry.position, idx as u32 + 1);
    }
}

#[tokio::test]
async fn cancelled_entry_stays_readable() {
    let (state, rid) = setup().await;
    let engine = state.engine.clone();

    let alice = engine.join(join_request(&rid, "Alice")).await.unwrap();
    engine.cancel(&alice.id_string()).await.unwrap();

    // Terminal document survives removal from the active set
    let read = engine.get_entry(&alice.id_string()).await.unwrap();
    assert_eq!(read.status, EntryStatus::Cancelled);
    assert!(engine.waiting_list(&rid).await.unwrap().is_empty());
}
