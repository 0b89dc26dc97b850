use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Records (Mapped to the Store) ---

/// Listing
///
/// A surplus-food donation offer. The descriptive fields (`food_name` through
/// `add_info`) are mutable as a group by `PATCH /foods/{id}`; `food_status`
/// is mutated only through the status endpoint; `email` identifies the donor
/// and is immutable after creation.
///
/// `food_status` is an open string. The conventional values are `available`,
/// `requested` and `delivered`, but no transition table is enforced: any
/// value may overwrite any other.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Listing {
    // Assigned by the repository on insert.
    pub id: Uuid,
    pub food_name: String,
    pub food_image: String,
    // Free-form quantity ("10 plates", "2 kg", ...), donor-supplied.
    pub food_quantity: String,
    #[ts(type = "string")]
    pub food_exdate: NaiveDate,
    pub food_location: String,
    pub add_info: Option<String>,
    // Donor identity; drives the ownership-scoped queries.
    pub email: String,
    pub food_status: String,
}

/// DonationRequest
///
/// A claim against a donor's Listing ("order" on the wire). Carries a
/// reference to the source Listing plus snapshot fields captured at creation
/// time. The reference is *not* validated against the listings collection,
/// and creating a request does not touch the source Listing's status or
/// quantity; the two records are independent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DonationRequest {
    pub id: Uuid,
    // Reference to the source Listing.
    pub food_id: Uuid,
    // Snapshot of the Listing at request time.
    pub food_name: String,
    pub food_image: String,
    pub donator_email: String,
    pub pickup_location: String,
    #[ts(type = "string")]
    pub request_date: DateTime<Utc>,
    // Requester identity; ownership-scoped queries filter on this.
    pub email: String,
    // Same permissive-string semantics as `Listing::food_status`.
    pub req_status: String,
}

// --- Request Payloads (Input Schemas) ---

/// NewListing
///
/// Creation payload for `POST /foods`. Inserted verbatim; the id is assigned
/// by the store. `food_status` defaults to `available` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewListing {
    pub food_name: String,
    pub food_image: String,
    pub food_quantity: String,
    #[ts(type = "string")]
    pub food_exdate: NaiveDate,
    pub food_location: String,
    pub add_info: Option<String>,
    pub email: String,
    #[serde(default = "default_food_status")]
    pub food_status: String,
}

fn default_food_status() -> String {
    "available".to_string()
}

/// NewDonationRequest
///
/// Creation payload for `POST /orders`. Inserted verbatim; `req_status`
/// defaults to `pending` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewDonationRequest {
    pub food_id: Uuid,
    pub food_name: String,
    pub food_image: String,
    pub donator_email: String,
    pub pickup_location: String,
    #[ts(type = "string")]
    pub request_date: DateTime<Utc>,
    pub email: String,
    #[serde(default = "default_req_status")]
    pub req_status: String,
}

fn default_req_status() -> String {
    "pending".to_string()
}

/// UpdateListingRequest
///
/// Payload for `PATCH /foods/{id}`. Replaces exactly the six descriptive
/// fields of the matched Listing; `food_status` and `email` are untouched by
/// this operation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateListingRequest {
    pub food_name: String,
    pub food_image: String,
    pub food_quantity: String,
    #[ts(type = "string")]
    pub food_exdate: NaiveDate,
    pub food_location: String,
    pub add_info: Option<String>,
}

/// Status payload for `PATCH /userFoods/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FoodStatusUpdate {
    pub food_status: String,
}

/// Status payload for `PATCH /user/orders/{id}`. The wire field is `status`,
/// not `reqStatus`; the two status endpoints have different payload shapes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct OrderStatusUpdate {
    pub status: String,
}

/// OwnerFilter
///
/// Query parameters accepted by the ownership-scoped list endpoints
/// (`GET /userFoods`, `GET /user/orders`). An absent `email` never passes the
/// identity check, so the unfiltered branch underneath stays latent.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct OwnerFilter {
    pub email: Option<String>,
}

/// SessionRequest
///
/// Identity claim supplied to `POST /jwt`. The email is the only part the
/// server signs into the session token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SessionRequest {
    pub email: String,
}

// --- Acknowledgment Bodies (Output Schemas) ---

/// Body returned by `POST /jwt` and `POST /logout`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SessionAck {
    pub success: bool,
}

/// InsertAck
///
/// Store-native insertion acknowledgment, returned verbatim to the client.
/// Carries the id the store assigned to the new record.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

/// UpdateAck
///
/// Store-native update acknowledgment. A miss is not an error: it reports
/// zero matched records.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// DeleteAck
///
/// Store-native delete acknowledgment. Deletion is idempotent: a second
/// delete of the same id reports `deleted_count: 0`, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
