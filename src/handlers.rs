use crate::{
    AppState,
    auth::{AuthUser, clear_session_cookie, issue_token, session_cookie},
    error::AppError,
    models::{
        DeleteAck, DonationRequest, FoodStatusUpdate, InsertAck, Listing, NewDonationRequest,
        NewListing, OrderStatusUpdate, OwnerFilter, SessionAck, SessionRequest, UpdateAck,
        UpdateListingRequest,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

/// How many soonest-expiring Listings the featured feed returns.
const FEATURED_LIMIT: i64 = 6;

// --- Session Handlers ---

/// issue_session
///
/// [Public Route] Signs a one-hour session token for the supplied identity
/// claim and delivers it in the `token` cookie. Nothing is persisted; the
/// cookie is the session.
#[utoipa::path(
    post,
    path = "/jwt",
    request_body = SessionRequest,
    responses((status = 200, description = "Session cookie issued", body = SessionAck))
)]
pub async fn issue_session(
    State(state): State<AppState>,
    Json(payload): Json<SessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = issue_token(&payload.email, &state.config.jwt_secret)?;
    tracing::debug!(email = %payload.email, "session token issued");

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(SessionAck { success: true }),
    ))
}

/// logout
///
/// [Public Route] Revokes the session by clearing the cookie (lifetime zero).
/// Succeeds whether or not a session existed.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Session cookie cleared", body = SessionAck))
)]
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(SessionAck { success: true }),
    )
}

// --- Listing Handlers ---

/// create_food
///
/// [Public Route] Inserts a new Listing verbatim from the caller-supplied
/// fields and returns the store's insertion acknowledgment, including the
/// assigned id.
#[utoipa::path(
    post,
    path = "/foods",
    request_body = NewListing,
    responses((status = 200, description = "Created", body = InsertAck))
)]
pub async fn create_food(
    State(state): State<AppState>,
    Json(payload): Json<NewListing>,
) -> Result<Json<InsertAck>, AppError> {
    Ok(Json(state.repo.create_listing(payload).await?))
}

/// get_foods
///
/// [Public Route] Lists every Listing. No ownership filter, no pagination.
#[utoipa::path(
    get,
    path = "/foods",
    responses((status = 200, description = "All listings", body = [Listing]))
)]
pub async fn get_foods(State(state): State<AppState>) -> Result<Json<Vec<Listing>>, AppError> {
    Ok(Json(state.repo.all_listings().await?))
}

/// get_food
///
/// [Public Route] Retrieves a single Listing by id. An expired `foodExdate`
/// does not hide a Listing; only a missing id yields 404.
#[utoipa::path(
    get,
    path = "/foods/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Found", body = Listing),
        (status = 404, description = "No such listing")
    )
)]
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, AppError> {
    let listing = state.repo.listing_by_id(id).await?;
    listing.map(Json).ok_or(AppError::NotFound)
}

/// update_food
///
/// [Public Route] Replaces exactly the descriptive field group of the matched
/// Listing; `foodStatus` is untouched by this operation. A miss reports zero
/// matched records in the acknowledgment rather than an error.
#[utoipa::path(
    patch,
    path = "/foods/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = UpdateListingRequest,
    responses((status = 200, description = "Update acknowledgment", body = UpdateAck))
)]
pub async fn update_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateListingRequest>,
) -> Result<Json<UpdateAck>, AppError> {
    Ok(Json(state.repo.update_listing(id, payload).await?))
}

/// delete_food
///
/// [Public Route] Removes a Listing. Idempotent: deleting a nonexistent id
/// acknowledges zero deleted records.
#[utoipa::path(
    delete,
    path = "/foods/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses((status = 200, description = "Delete acknowledgment", body = DeleteAck))
)]
pub async fn delete_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAck>, AppError> {
    Ok(Json(state.repo.delete_listing(id).await?))
}

/// get_user_foods
///
/// [Authenticated Route] Lists the caller's own Listings.
///
/// The identity check compares the verified session email against the `email`
/// query parameter: a mismatch (including an absent parameter) is 403 even
/// though the caller is authenticated.
#[utoipa::path(
    get,
    path = "/userFoods",
    params(OwnerFilter),
    responses(
        (status = 200, description = "Caller's listings", body = [Listing]),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Identity mismatch")
    )
)]
pub async fn get_user_foods(
    user: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<OwnerFilter>,
) -> Result<Json<Vec<Listing>>, AppError> {
    if filter.email.as_deref() != Some(user.email.as_str()) {
        return Err(AppError::Forbidden);
    }

    Ok(Json(
        state.repo.listings_by_owner(filter.email.as_deref()).await?,
    ))
}

/// update_food_status
///
/// [Public Route] Mutates only `foodStatus`. The field is an open string with
/// no enforced transition table: any value overwrites any other.
#[utoipa::path(
    patch,
    path = "/userFoods/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = FoodStatusUpdate,
    responses((status = 200, description = "Update acknowledgment", body = UpdateAck))
)]
pub async fn update_food_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FoodStatusUpdate>,
) -> Result<Json<UpdateAck>, AppError> {
    Ok(Json(
        state
            .repo
            .set_listing_status(id, &payload.food_status)
            .await?,
    ))
}

// --- Donation Request ("order") Handlers ---

/// get_orders
///
/// [Public Route] Lists every donation request. Open read access.
#[utoipa::path(
    get,
    path = "/orders",
    responses((status = 200, description = "All requests", body = [DonationRequest]))
)]
pub async fn get_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<DonationRequest>>, AppError> {
    Ok(Json(state.repo.all_requests().await?))
}

/// create_order
///
/// [Public Route] Inserts a new donation request verbatim. The referenced
/// Listing is not validated and its status and quantity are not touched;
/// the two records are deliberately independent.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = NewDonationRequest,
    responses((status = 200, description = "Created", body = InsertAck))
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<NewDonationRequest>,
) -> Result<Json<InsertAck>, AppError> {
    Ok(Json(state.repo.create_request(payload).await?))
}

/// update_order_status
///
/// [Public Route] Mutates only `reqStatus`, with the same permissive-string
/// semantics as the Listing status. The payload field is `status`.
#[utoipa::path(
    patch,
    path = "/user/orders/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = OrderStatusUpdate,
    responses((status = 200, description = "Update acknowledgment", body = UpdateAck))
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderStatusUpdate>,
) -> Result<Json<UpdateAck>, AppError> {
    Ok(Json(
        state.repo.set_request_status(id, &payload.status).await?,
    ))
}

/// delete_order
///
/// [Public Route] Removes a donation request. Same idempotent semantics as
/// the Listing delete.
#[utoipa::path(
    delete,
    path = "/user/orders/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses((status = 200, description = "Delete acknowledgment", body = DeleteAck))
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAck>, AppError> {
    Ok(Json(state.repo.delete_request(id).await?))
}

/// get_user_orders
///
/// [Authenticated Route] Lists the caller's own donation requests, behind the
/// same identity check as `get_user_foods`.
#[utoipa::path(
    get,
    path = "/user/orders",
    params(OwnerFilter),
    responses(
        (status = 200, description = "Caller's requests", body = [DonationRequest]),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Identity mismatch")
    )
)]
pub async fn get_user_orders(
    user: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<OwnerFilter>,
) -> Result<Json<Vec<DonationRequest>>, AppError> {
    if filter.email.as_deref() != Some(user.email.as_str()) {
        return Err(AppError::Forbidden);
    }

    Ok(Json(
        state.repo.requests_by_owner(filter.email.as_deref()).await?,
    ))
}

// --- Featured Feed ---

/// get_featured_foods
///
/// [Public Route] The curated feed: up to six Listings ordered soonest expiry
/// first, tie-broken by id so the result is reproducible.
#[utoipa::path(
    get,
    path = "/featuredFoods",
    responses((status = 200, description = "Soonest-expiring listings", body = [Listing]))
)]
pub async fn get_featured_foods(
    State(state): State<AppState>,
) -> Result<Json<Vec<Listing>>, AppError> {
    Ok(Json(state.repo.soon_expiring(FEATURED_LIMIT).await?))
}
