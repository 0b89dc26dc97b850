use food_server::{
    AppConfig, AppState, MemoryRepository, create_router,
    models::{DeleteAck, DonationRequest, InsertAck, Listing, UpdateAck},
    repository::RepositoryState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

/// Spins up the full router on an ephemeral port over the in-memory
/// repository, so every test exercises the real HTTP surface (routing,
/// middleware, cookie handling) without a database.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::new()) as RepositoryState;
    let config = AppConfig::default();

    let state = AppState { repo, config };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

fn rice_listing(email: &str) -> serde_json::Value {
    serde_json::json!({
        "foodName": "Rice",
        "foodImage": "https://img.example/rice.jpg",
        "foodQuantity": "10 plates",
        "foodExdate": "2024-01-01",
        "foodLocation": "Dhaka",
        "addInfo": "Cooked this morning",
        "email": email,
        "foodStatus": "available"
    })
}

/// Logs in as `email` and returns the `token=...` cookie pair to replay on
/// guarded requests. The cookie is `Secure`, so a client-side jar would drop
/// it over plain http; the tests forward it explicitly instead.
async fn login(client: &reqwest::Client, address: &str, email: &str) -> String {
    let response = client
        .post(format!("{}/jwt", address))
        .json(&serde_json::json!({ "email": email }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), 200);

    let set_cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("no Set-Cookie on /jwt response")
        .to_str()
        .unwrap();

    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));

    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_liveness_banner() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&app.address)
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "foodServer is running");
}

#[tokio::test]
async fn test_listing_round_trip() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/foods", app.address))
        .json(&rice_listing("a@x.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let ack: InsertAck = response.json().await.unwrap();
    assert!(ack.acknowledged);

    // Every created field comes back unchanged, plus the assigned id.
    let fetched: Listing = client
        .get(format!("{}/foods/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched.id, ack.inserted_id);
    assert_eq!(fetched.food_name, "Rice");
    assert_eq!(fetched.food_quantity, "10 plates");
    assert_eq!(fetched.food_exdate.to_string(), "2024-01-01");
    assert_eq!(fetched.food_location, "Dhaka");
    assert_eq!(fetched.add_info.as_deref(), Some("Cooked this morning"));
    assert_eq!(fetched.email, "a@x.com");
    assert_eq!(fetched.food_status, "available");

    // And the open list contains it.
    let all: Vec<Listing> = client
        .get(format!("{}/foods", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.iter().any(|l| l.id == ack.inserted_id));
}

#[tokio::test]
async fn test_get_food_unknown_id_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/foods/{}", app.address, Uuid::new_v4()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_ownership_scoped_listing_access() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for email in ["a@x.com", "b@x.com"] {
        let response = client
            .post(format!("{}/foods", app.address))
            .json(&rice_listing(email))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    // No session at all: the gate answers 401 before any handler runs.
    let response = client
        .get(format!("{}/userFoods?email=a@x.com", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let cookie = login(&client, &app.address, "a@x.com").await;

    // Authenticated as a@x.com but asking for b@x.com's records: 403.
    let response = client
        .get(format!("{}/userFoods?email=b@x.com", app.address))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Omitting the parameter can never match the verified identity: 403.
    let response = client
        .get(format!("{}/userFoods", app.address))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Matching identity: exactly the caller's records.
    let mine: Vec<Listing> = client
        .get(format!("{}/userFoods?email=a@x.com", app.address))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert!(mine.iter().all(|l| l.email == "a@x.com"));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/logout", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let set_cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("no Set-Cookie on /logout response")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_update_description_preserves_status() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let ack: InsertAck = client
        .post(format!("{}/foods", app.address))
        .json(&rice_listing("a@x.com"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .patch(format!("{}/foods/{}", app.address, ack.inserted_id))
        .json(&serde_json::json!({
            "foodName": "Fried Rice",
            "foodImage": "https://img.example/fried.jpg",
            "foodQuantity": "5 plates",
            "foodExdate": "2024-02-02",
            "foodLocation": "Chittagong",
            "addInfo": null
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let update: UpdateAck = response.json().await.unwrap();
    assert_eq!(update.matched_count, 1);

    let fetched: Listing = client
        .get(format!("{}/foods/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // The descriptive group is replaced...
    assert_eq!(fetched.food_name, "Fried Rice");
    assert_eq!(fetched.food_location, "Chittagong");
    assert_eq!(fetched.add_info, None);
    // ...while status and owner are untouched.
    assert_eq!(fetched.food_status, "available");
    assert_eq!(fetched.email, "a@x.com");
}

#[tokio::test]
async fn test_status_update_changes_only_status() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let ack: InsertAck = client
        .post(format!("{}/foods", app.address))
        .json(&rice_listing("a@x.com"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let before: Listing = client
        .get(format!("{}/foods/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .patch(format!("{}/userFoods/{}", app.address, ack.inserted_id))
        .json(&serde_json::json!({ "foodStatus": "delivered" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let after: Listing = client
        .get(format!("{}/foods/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after.food_status, "delivered");
    assert_eq!(after.food_name, before.food_name);
    assert_eq!(after.food_image, before.food_image);
    assert_eq!(after.food_quantity, before.food_quantity);
    assert_eq!(after.food_exdate, before.food_exdate);
    assert_eq!(after.food_location, before.food_location);
    assert_eq!(after.add_info, before.add_info);
    assert_eq!(after.email, before.email);
}

#[tokio::test]
async fn test_status_field_is_permissive() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let ack: InsertAck = client
        .post(format!("{}/foods", app.address))
        .json(&rice_listing("a@x.com"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // No transition table: any value overwrites any other, including ones
    // outside the conventional set.
    for status in ["delivered", "available", "on-hold"] {
        let response = client
            .patch(format!("{}/userFoods/{}", app.address, ack.inserted_id))
            .json(&serde_json::json!({ "foodStatus": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let fetched: Listing = client
        .get(format!("{}/foods/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.food_status, "on-hold");
}

#[tokio::test]
async fn test_delete_listing_is_idempotent() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let ack: InsertAck = client
        .post(format!("{}/foods", app.address))
        .json(&rice_listing("a@x.com"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let first: DeleteAck = client
        .delete(format!("{}/foods/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first.deleted_count, 1);

    // Second delete of the same id: zero affected, still a 200.
    let response = client
        .delete(format!("{}/foods/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let second: DeleteAck = response.json().await.unwrap();
    assert_eq!(second.deleted_count, 0);
}

#[tokio::test]
async fn test_featured_feed_orders_by_soonest_expiry() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Ten listings with distinct expiry dates, inserted out of order.
    let days = [7, 3, 10, 1, 9, 4, 8, 2, 6, 5];
    for day in days {
        let mut body = rice_listing("a@x.com");
        body["foodName"] = serde_json::json!(format!("Meal {}", day));
        body["foodExdate"] = serde_json::json!(format!("2025-03-{:02}", day));
        let response = client
            .post(format!("{}/foods", app.address))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let featured: Vec<Listing> = client
        .get(format!("{}/featuredFoods", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Exactly the six smallest dates, ascending.
    let dates: Vec<String> = featured
        .iter()
        .map(|l| l.food_exdate.to_string())
        .collect();
    assert_eq!(
        dates,
        vec![
            "2025-03-01",
            "2025-03-02",
            "2025-03-03",
            "2025-03-04",
            "2025-03-05",
            "2025-03-06"
        ]
    );
}

#[tokio::test]
async fn test_order_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let order = serde_json::json!({
        "foodId": Uuid::new_v4(),
        "foodName": "Rice",
        "foodImage": "https://img.example/rice.jpg",
        "donatorEmail": "a@x.com",
        "pickupLocation": "Dhaka",
        "requestDate": "2024-01-01T10:00:00Z",
        "email": "b@x.com",
        "reqStatus": "pending"
    });

    let ack: InsertAck = client
        .post(format!("{}/orders", app.address))
        .json(&order)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(ack.acknowledged);

    // Open read: no session required.
    let all: Vec<DonationRequest> = client
        .get(format!("{}/orders", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].req_status, "pending");

    // The order status payload field is `status`, unlike the food one.
    let update: UpdateAck = client
        .patch(format!("{}/user/orders/{}", app.address, ack.inserted_id))
        .json(&serde_json::json!({ "status": "delivered" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(update.matched_count, 1);

    // Ownership-scoped read for the requester.
    let cookie = login(&client, &app.address, "b@x.com").await;
    let mine: Vec<DonationRequest> = client
        .get(format!("{}/user/orders?email=b@x.com", app.address))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].req_status, "delivered");

    // A requester cannot read the donator's view of orders.
    let response = client
        .get(format!("{}/user/orders?email=a@x.com", app.address))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Idempotent removal.
    let first: DeleteAck = client
        .delete(format!("{}/user/orders/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first.deleted_count, 1);

    let second: DeleteAck = client
        .delete(format!("{}/user/orders/{}", app.address, ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second.deleted_count, 0);
}

#[tokio::test]
async fn test_creating_order_does_not_touch_listing() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let listing_ack: InsertAck = client
        .post(format!("{}/foods", app.address))
        .json(&rice_listing("a@x.com"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/orders", app.address))
        .json(&serde_json::json!({
            "foodId": listing_ack.inserted_id,
            "foodName": "Rice",
            "foodImage": "https://img.example/rice.jpg",
            "donatorEmail": "a@x.com",
            "pickupLocation": "Dhaka",
            "requestDate": "2024-01-01T10:00:00Z",
            "email": "b@x.com"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // No cross-entity transaction: the source listing keeps its status.
    let listing: Listing = client
        .get(format!("{}/foods/{}", app.address, listing_ack.inserted_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing.food_status, "available");
}
