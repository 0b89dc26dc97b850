use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the ownership-scoped endpoints: the two "list mine" reads that
/// filter by a caller-supplied `email` query parameter.
///
/// Access Control Strategy:
/// The router layer above this module runs the `AuthUser` extractor, so an
/// invalid or missing session cookie is rejected with 401 before any handler
/// runs. The handlers themselves then compare the verified email against the
/// query parameter and answer 403 on a mismatch, since being logged in does not
/// grant access to another identity's records.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /userFoods?email=
        // Lists the Listings owned by the verified caller.
        .route("/userFoods", get(handlers::get_user_foods))
        // GET /user/orders?email=
        // Lists the donation requests made by the verified caller.
        .route("/user/orders", get(handlers::get_user_orders))
}
