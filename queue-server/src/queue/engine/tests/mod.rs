use super::*;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db;
use crate::db::models::RestaurantCreate;
use crate::db::repository::RestaurantRepository;

mod test_ordering;
mod test_policy;

/// In-memory engine plus a seeded restaurant
async fn setup() -> (Surreal<Db>, QueueEngine, String) {
    let db = db::open_in_memory().await.unwrap();

    let repo = RestaurantRepository::new(db.clone());
    let restaurant = repo
        .create(
            RestaurantCreate {
                name: "Test Kopitiam".to_string(),
                cuisine: "Singaporean".to_string(),
                address: "1 Test Way".to_string(),
                location: None,
                min_party_size: None,
                max_party_size: None,
                notification_timer: None,
            },
            "owner-test",
        )
        .await
        .unwrap();

    let engine = QueueEngine::new(db.clone(), MessageBus::new(), chrono_tz::Asia::Singapore);
    (db, engine, restaurant.id_string())
}

fn join_request(restaurant_id: &str, name: &str, party_size: u32) -> JoinRequest {
    JoinRequest {
        restaurant_id: restaurant_id.to_string(),
        customer_name: name.to_string(),
        party_size,
        phone_number: Some("+65 9000 0000".to_string()),
        is_walk_in: false,
    }
}

async fn join(engine: &QueueEngine, restaurant_id: &str, name: &str) -> QueueEntry {
    engine
        .join(join_request(restaurant_id, name, 2))
        .await
        .unwrap()
}

/// Positions of the active set must be exactly {1..N}, in order
async fn assert_dense_positions(engine: &QueueEngine, restaurant_id: &str) {
    let list = engine.waiting_list(restaurant_id).await.unwrap();
    for (idx, entry) in list.iter().enumerate() {
        assert_eq!(
            entry.position,
            idx as u32 + 1,
            "position gap or duplicate at index {idx} for {}",
            entry.customer_name
        );
    }
}

async fn restaurant_record(
    db: &Surreal<Db>,
    restaurant_id: &str,
) -> crate::db::models::Restaurant {
    RestaurantRepository::new(db.clone())
        .find_by_id(restaurant_id)
        .await
        .unwrap()
        .unwrap()
}
