use super::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[tokio::test]
async fn join_assigns_tail_positions_and_estimates() {
    let (_db, engine, rid) = setup().await;

    // Scenario B from the reference behavior
    let a = engine.join(join_request(&rid, "A", 2)).await.unwrap();
    assert_eq!(a.position, 1);
    assert_eq!(a.estimated_wait_time, 10);
    assert_eq!((a.wait_time_range.min, a.wait_time_range.max), (8, 12));

    let b = engine.join(join_request(&rid, "B", 3)).await.unwrap();
    assert_eq!(b.position, 2);
    assert_eq!(b.estimated_wait_time, 20);
    assert_eq!((b.wait_time_range.min, b.wait_time_range.max), (16, 24));
}

#[tokio::test]
async fn admit_renumbers_and_reestimates_remainder() {
    let (db, engine, rid) = setup().await;

    let a = join(&engine, &rid, "A").await;
    join(&engine, &rid, "B").await;
    join(&engine, &rid, "C").await;
    assert_eq!(restaurant_record(&db, &rid).await.queue_length, 3);

    // Scenario C: admit the head
    let admitted = engine.admit(&a.id_string()).await.unwrap();
    assert_eq!(admitted.status, EntryStatus::Seated);

    let list = engine.waiting_list(&rid).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].customer_name, "B");
    assert_eq!(list[0].position, 1);
    assert_eq!(list[0].estimated_wait_time, 10);
    assert_eq!(list[1].customer_name, "C");
    assert_eq!(list[1].position, 2);
    assert_eq!(list[1].estimated_wait_time, 20);

    let restaurant = restaurant_record(&db, &rid).await;
    assert_eq!(restaurant.queue_length, 2);
    assert_eq!(restaurant.current_wait_time, 20);
}

#[tokio::test]
async fn join_then_remove_restores_position_set() {
    let (_db, engine, rid) = setup().await;

    join(&engine, &rid, "A").await;
    join(&engine, &rid, "B").await;
    let before: Vec<u32> = engine
        .waiting_list(&rid)
        .await
        .unwrap()
        .iter()
        .map(|e| e.position)
        .collect();

    let c = join(&engine, &rid, "C").await;
    engine.remove(&c.id_string()).await.unwrap();

    let after: Vec<u32> = engine
        .waiting_list(&rid)
        .await
        .unwrap()
        .iter()
        .map(|e| e.position)
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn walk_ins_share_the_fifo_track() {
    let (_db, engine, rid) = setup().await;

    join(&engine, &rid, "Online").await;

    let walk_in = engine
        .join(JoinRequest {
            restaurant_id: rid.clone(),
            customer_name: "WalkIn".to_string(),
            party_size: 2,
            phone_number: None,
            is_walk_in: true,
        })
        .await
        .unwrap();

    // Positioned purely by arrival order, not by channel
    assert_eq!(walk_in.position, 2);
    // Already physically present: the call/return cycle is skipped
    assert!(walk_in.ready_to_return);
    assert!(walk_in.notification_sent);
    assert!(walk_in.notified_at.is_some());
    assert_eq!(walk_in.grace_period_expiry, None);
}

#[tokio::test]
async fn call_keeps_entry_counted_at_position_one() {
    let (db, engine, rid) = setup().await;

    join(&engine, &rid, "A").await;
    join(&engine, &rid, "B").await;

    let called = engine.call_next(&rid).await.unwrap();
    assert_eq!(called.customer_name, "A");
    assert_eq!(called.status, EntryStatus::Called);
    assert_eq!(called.position, 1);

    // Still visible and counted until seated/skipped
    let list = engine.waiting_list(&rid).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].status, EntryStatus::Called);
    assert_eq!(restaurant_record(&db, &rid).await.queue_length, 2);

    engine.admit(&called.id_string()).await.unwrap();
    let list = engine.waiting_list(&rid).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].customer_name, "B");
    assert_eq!(list[0].position, 1);
}

#[tokio::test]
async fn cancel_marks_entry_cancelled() {
    let (_db, engine, rid) = setup().await;

    let a = join(&engine, &rid, "A").await;
    let cancelled = engine.cancel(&a.id_string()).await.unwrap();
    assert_eq!(cancelled.status, EntryStatus::Cancelled);

    // Terminal entries never re-enter the queue
    let err = engine.admit(&a.id_string()).await.unwrap_err();
    assert!(matches!(err, QueueError::InvalidTransition { .. }));
    assert!(engine.waiting_list(&rid).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_entry_is_not_found() {
    let (_db, engine, _rid) = setup().await;
    let err = engine.remove("queue_entry:missing").await.unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}

#[tokio::test]
async fn emptying_the_queue_resets_caches() {
    let (db, engine, rid) = setup().await;

    let a = join(&engine, &rid, "A").await;
    engine.admit(&a.id_string()).await.unwrap();

    let restaurant = restaurant_record(&db, &rid).await;
    assert_eq!(restaurant.queue_length, 0);
    assert_eq!(restaurant.current_wait_time, 0);
}

#[tokio::test]
async fn randomized_mutations_preserve_dense_positions() {
    let (_db, engine, rid) = setup().await;
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut live: Vec<String> = Vec::new();
    let mut joined = 0u32;

    for _ in 0..60 {
        let roll: u8 = rng.gen_range(0..10);
        if roll < 5 || live.is_empty() {
            joined += 1;
            let entry = join(&engine, &rid, &format!("guest-{joined}")).await;
            live.push(entry.id_string());
        } else {
            let idx = rng.gen_range(0..live.len());
            let id = live.swap_remove(idx);
            match roll {
                5 | 6 => {
                    engine.admit(&id).await.unwrap();
                }
                7 | 8 => {
                    engine.remove(&id).await.unwrap();
                }
                _ => {
                    engine.cancel(&id).await.unwrap();
                }
            }
        }

        assert_dense_positions(&engine, &rid).await;
        let list = engine.waiting_list(&rid).await.unwrap();
        assert_eq!(list.len(), live.len());
    }
}
