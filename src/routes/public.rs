use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Public Router Module
///
/// Defines the endpoints that require no session: the session gateway itself
/// (`/jwt`, `/logout`), the open Listing and order surface, and the featured
/// feed. Mutation-by-id endpoints live here too; they are deliberately not
/// gated, matching the system's contract that only the "list mine" reads are
/// ownership-checked.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Liveness banner used by uptime checks.
        .route("/", get(|| async { "foodServer is running" }))
        // POST /jwt
        // Issues the session cookie from the supplied identity claim.
        .route("/jwt", post(handlers::issue_session))
        // POST /logout
        // Clears the session cookie; always succeeds.
        .route("/logout", post(handlers::logout))
        // GET/POST /foods
        // Full Listing collection read, and Listing creation.
        .route("/foods", get(handlers::get_foods).post(handlers::create_food))
        // GET/PATCH/DELETE /foods/{id}
        // Single-Listing read, descriptive-field update, and idempotent delete.
        .route(
            "/foods/{id}",
            get(handlers::get_food)
                .patch(handlers::update_food)
                .delete(handlers::delete_food),
        )
        // PATCH /userFoods/{id}
        // Listing status transition (open string, no transition table).
        .route("/userFoods/{id}", patch(handlers::update_food_status))
        // GET/POST /orders
        // Full donation-request collection read, and request creation.
        .route(
            "/orders",
            get(handlers::get_orders).post(handlers::create_order),
        )
        // PATCH/DELETE /user/orders/{id}
        // Request status transition (payload field is `status`) and
        // idempotent request removal.
        .route(
            "/user/orders/{id}",
            patch(handlers::update_order_status).delete(handlers::delete_order),
        )
        // GET /featuredFoods
        // Up to six soonest-expiring Listings, ascending by expiry date.
        .route("/featuredFoods", get(handlers::get_featured_foods))
}
