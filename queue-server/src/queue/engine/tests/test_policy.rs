use super::*;

#[tokio::test]
async fn policy_defaults_applied_at_creation() {
    let (db, _engine, rid) = setup().await;
    let restaurant = restaurant_record(&db, &rid).await;
    assert_eq!(restaurant.min_party_size, 1);
    assert_eq!(restaurant.max_party_size, 20);
    assert_eq!(restaurant.notification_timer, 10);
    assert!(!restaurant.queue_paused);
}

#[tokio::test]
async fn party_size_outside_bounds_is_rejected() {
    let (_db, engine, rid) = setup().await;

    engine.set_party_size_limits(&rid, 1, 4).await.unwrap();

    // Scenario A
    let err = engine.join(join_request(&rid, "A", 5)).await.unwrap_err();
    match err {
        QueueError::InvalidPartySize { party_size, min, max } => {
            assert_eq!((party_size, min, max), (5, 1, 4));
        }
        other => panic!("expected InvalidPartySize, got {other:?}"),
    }
    // The violated bound is in the message for the caller to show
    let err = engine.join(join_request(&rid, "A", 5)).await.unwrap_err();
    assert!(err.to_string().contains("1-4"));

    // Nothing was written
    assert!(engine.waiting_list(&rid).await.unwrap().is_empty());
}

#[tokio::test]
async fn paused_queue_rejects_joins_until_resumed() {
    let (db, engine, rid) = setup().await;

    engine.set_pause(&rid, true).await.unwrap();
    let restaurant = restaurant_record(&db, &rid).await;
    assert!(restaurant.queue_paused);
    assert!(restaurant.last_paused_at.is_some());

    let err = engine.join(join_request(&rid, "A", 2)).await.unwrap_err();
    assert!(matches!(err, QueueError::QueuePaused));

    engine.set_pause(&rid, false).await.unwrap();
    let entry = engine.join(join_request(&rid, "A", 2)).await.unwrap();
    assert_eq!(entry.position, 1);
}

#[tokio::test]
async fn inverted_party_size_limits_leave_state_unchanged() {
    let (db, engine, rid) = setup().await;

    // Scenario E
    let err = engine.set_party_size_limits(&rid, 5, 3).await.unwrap_err();
    assert!(matches!(err, QueueError::InvalidRange(_)));

    let restaurant = restaurant_record(&db, &rid).await;
    assert_eq!(restaurant.min_party_size, 1);
    assert_eq!(restaurant.max_party_size, 20);
}

#[tokio::test]
async fn party_size_limits_validate_bounds() {
    let (_db, engine, rid) = setup().await;

    assert!(matches!(
        engine.set_party_size_limits(&rid, 0, 10).await,
        Err(QueueError::InvalidRange(_))
    ));
    assert!(matches!(
        engine.set_party_size_limits(&rid, 1, 51).await,
        Err(QueueError::InvalidRange(_))
    ));

    let restaurant = engine.set_party_size_limits(&rid, 2, 8).await.unwrap();
    assert_eq!(restaurant.min_party_size, 2);
    assert_eq!(restaurant.max_party_size, 8);
}

#[tokio::test]
async fn grace_period_validates_bounds() {
    let (_db, engine, rid) = setup().await;

    assert!(matches!(
        engine.set_grace_period(&rid, 0).await,
        Err(QueueError::InvalidRange(_))
    ));
    assert!(matches!(
        engine.set_grace_period(&rid, 61).await,
        Err(QueueError::InvalidRange(_))
    ));

    let restaurant = engine.set_grace_period(&rid, 15).await.unwrap();
    assert_eq!(restaurant.notification_timer, 15);
}

#[tokio::test]
async fn unknown_restaurant_is_not_found() {
    let (_db, engine, _rid) = setup().await;
    let err = engine
        .join(join_request("restaurant:missing", "A", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}
