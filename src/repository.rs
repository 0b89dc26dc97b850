use crate::models::{
    DeleteAck, DonationRequest, InsertAck, Listing, NewDonationRequest, NewListing, UpdateAck,
    UpdateListingRequest,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations over the two record
/// collections, `listings` and `donation_requests`. Handlers interact with
/// the data layer only through this trait, so the concrete backend (Postgres,
/// in-memory) can be swapped without touching them.
///
/// Each operation maps to exactly one store call and returns the store's raw
/// outcome: inserted records come back as an `InsertAck` carrying the
/// assigned id, and update/delete report matched/affected counts rather than
/// erroring on a miss. A store failure surfaces as the `sqlx::Error` for that
/// single call; there are no retries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Listings ---
    async fn create_listing(&self, new: NewListing) -> sqlx::Result<InsertAck>;
    async fn all_listings(&self) -> sqlx::Result<Vec<Listing>>;
    async fn listing_by_id(&self, id: Uuid) -> sqlx::Result<Option<Listing>>;
    // Replaces exactly the descriptive field group; `food_status` untouched.
    async fn update_listing(&self, id: Uuid, req: UpdateListingRequest) -> sqlx::Result<UpdateAck>;
    // Idempotent: a missing id reports zero deleted records.
    async fn delete_listing(&self, id: Uuid) -> sqlx::Result<DeleteAck>;
    // `None` means no filter, i.e. the full collection. Callers that expose this
    // over HTTP are expected to have applied the ownership check first.
    async fn listings_by_owner(&self, email: Option<&str>) -> sqlx::Result<Vec<Listing>>;
    // Mutates only `food_status`. Any value overwrites any other.
    async fn set_listing_status(&self, id: Uuid, status: &str) -> sqlx::Result<UpdateAck>;
    // Soonest-expiring subset, ordered by expiry date with id as the
    // deterministic tie-break.
    async fn soon_expiring(&self, limit: i64) -> sqlx::Result<Vec<Listing>>;

    // --- Donation requests ---
    async fn create_request(&self, new: NewDonationRequest) -> sqlx::Result<InsertAck>;
    async fn all_requests(&self) -> sqlx::Result<Vec<DonationRequest>>;
    async fn requests_by_owner(&self, email: Option<&str>) -> sqlx::Result<Vec<DonationRequest>>;
    async fn set_request_status(&self, id: Uuid, status: &str) -> sqlx::Result<UpdateAck>;
    async fn delete_request(&self, id: Uuid) -> sqlx::Result<DeleteAck>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

const LISTING_COLUMNS: &str =
    "id, food_name, food_image, food_quantity, food_exdate, food_location, add_info, email, food_status";

const REQUEST_COLUMNS: &str =
    "id, food_id, food_name, food_image, donator_email, pickup_location, request_date, email, req_status";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL database. Ids are assigned here on insert; everything else is a
/// single statement per operation.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_listing(&self, new: NewListing) -> sqlx::Result<InsertAck> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO listings (id, food_name, food_image, food_quantity, food_exdate, food_location, add_info, email, food_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id)
        .bind(&new.food_name)
        .bind(&new.food_image)
        .bind(&new.food_quantity)
        .bind(new.food_exdate)
        .bind(&new.food_location)
        .bind(&new.add_info)
        .bind(&new.email)
        .bind(&new.food_status)
        .execute(&self.pool)
        .await?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn all_listings(&self) -> sqlx::Result<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(&format!("SELECT {} FROM listings", LISTING_COLUMNS))
            .fetch_all(&self.pool)
            .await
    }

    async fn listing_by_id(&self, id: Uuid) -> sqlx::Result<Option<Listing>> {
        sqlx::query_as::<_, Listing>(&format!(
            "SELECT {} FROM listings WHERE id = $1",
            LISTING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_listing(&self, id: Uuid, req: UpdateListingRequest) -> sqlx::Result<UpdateAck> {
        let result = sqlx::query(
            "UPDATE listings \
             SET food_name = $2, food_image = $3, food_quantity = $4, \
                 food_exdate = $5, food_location = $6, add_info = $7 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&req.food_name)
        .bind(&req.food_image)
        .bind(&req.food_quantity)
        .bind(req.food_exdate)
        .bind(&req.food_location)
        .bind(&req.add_info)
        .execute(&self.pool)
        .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.rows_affected(),
            modified_count: result.rows_affected(),
        })
    }

    async fn delete_listing(&self, id: Uuid) -> sqlx::Result<DeleteAck> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    /// listings_by_owner
    ///
    /// Dynamic filter via QueryBuilder: with an email the query is scoped to
    /// that owner, without one it degrades to the full collection.
    async fn listings_by_owner(&self, email: Option<&str>) -> sqlx::Result<Vec<Listing>> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM listings", LISTING_COLUMNS));

        if let Some(email) = email {
            builder.push(" WHERE email = ");
            builder.push_bind(email);
        }

        builder
            .build_query_as::<Listing>()
            .fetch_all(&self.pool)
            .await
    }

    async fn set_listing_status(&self, id: Uuid, status: &str) -> sqlx::Result<UpdateAck> {
        let result = sqlx::query("UPDATE listings SET food_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.rows_affected(),
            modified_count: result.rows_affected(),
        })
    }

    /// soon_expiring
    ///
    /// Soonest expiry first; `id` is the secondary key so equal dates come
    /// back in a reproducible order.
    async fn soon_expiring(&self, limit: i64) -> sqlx::Result<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(&format!(
            "SELECT {} FROM listings ORDER BY food_exdate ASC, id ASC LIMIT $1",
            LISTING_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_request(&self, new: NewDonationRequest) -> sqlx::Result<InsertAck> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO donation_requests (id, food_id, food_name, food_image, donator_email, pickup_location, request_date, email, req_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id)
        .bind(new.food_id)
        .bind(&new.food_name)
        .bind(&new.food_image)
        .bind(&new.donator_email)
        .bind(&new.pickup_location)
        .bind(new.request_date)
        .bind(&new.email)
        .bind(&new.req_status)
        .execute(&self.pool)
        .await?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn all_requests(&self) -> sqlx::Result<Vec<DonationRequest>> {
        sqlx::query_as::<_, DonationRequest>(&format!(
            "SELECT {} FROM donation_requests",
            REQUEST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn requests_by_owner(&self, email: Option<&str>) -> sqlx::Result<Vec<DonationRequest>> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM donation_requests", REQUEST_COLUMNS));

        if let Some(email) = email {
            builder.push(" WHERE email = ");
            builder.push_bind(email);
        }

        builder
            .build_query_as::<DonationRequest>()
            .fetch_all(&self.pool)
            .await
    }

    async fn set_request_status(&self, id: Uuid, status: &str) -> sqlx::Result<UpdateAck> {
        let result = sqlx::query("UPDATE donation_requests SET req_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.rows_affected(),
            modified_count: result.rows_affected(),
        })
    }

    async fn delete_request(&self, id: Uuid) -> sqlx::Result<DeleteAck> {
        let result = sqlx::query("DELETE FROM donation_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }
}

/// MemoryRepository
///
/// An in-memory implementation of `Repository` with the same observable
/// semantics as the Postgres one, used by the test suite so the full HTTP
/// surface can be exercised without a database.
#[derive(Default)]
pub struct MemoryRepository {
    listings: RwLock<Vec<Listing>>,
    requests: RwLock<Vec<DonationRequest>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_listing(&self, new: NewListing) -> sqlx::Result<InsertAck> {
        let id = Uuid::new_v4();
        self.listings.write().unwrap().push(Listing {
            id,
            food_name: new.food_name,
            food_image: new.food_image,
            food_quantity: new.food_quantity,
            food_exdate: new.food_exdate,
            food_location: new.food_location,
            add_info: new.add_info,
            email: new.email,
            food_status: new.food_status,
        });

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn all_listings(&self) -> sqlx::Result<Vec<Listing>> {
        Ok(self.listings.read().unwrap().clone())
    }

    async fn listing_by_id(&self, id: Uuid) -> sqlx::Result<Option<Listing>> {
        Ok(self
            .listings
            .read()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn update_listing(&self, id: Uuid, req: UpdateListingRequest) -> sqlx::Result<UpdateAck> {
        let mut listings = self.listings.write().unwrap();
        let matched = match listings.iter_mut().find(|l| l.id == id) {
            Some(listing) => {
                listing.food_name = req.food_name;
                listing.food_image = req.food_image;
                listing.food_quantity = req.food_quantity;
                listing.food_exdate = req.food_exdate;
                listing.food_location = req.food_location;
                listing.add_info = req.add_info;
                1
            }
            None => 0,
        };

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: matched,
            modified_count: matched,
        })
    }

    async fn delete_listing(&self, id: Uuid) -> sqlx::Result<DeleteAck> {
        let mut listings = self.listings.write().unwrap();
        let before = listings.len();
        listings.retain(|l| l.id != id);

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - listings.len()) as u64,
        })
    }

    async fn listings_by_owner(&self, email: Option<&str>) -> sqlx::Result<Vec<Listing>> {
        Ok(self
            .listings
            .read()
            .unwrap()
            .iter()
            .filter(|l| email.is_none_or(|e| l.email == e))
            .cloned()
            .collect())
    }

    async fn set_listing_status(&self, id: Uuid, status: &str) -> sqlx::Result<UpdateAck> {
        let mut listings = self.listings.write().unwrap();
        let matched = match listings.iter_mut().find(|l| l.id == id) {
            Some(listing) => {
                listing.food_status = status.to_string();
                1
            }
            None => 0,
        };

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: matched,
            modified_count: matched,
        })
    }

    async fn soon_expiring(&self, limit: i64) -> sqlx::Result<Vec<Listing>> {
        let mut listings = self.listings.read().unwrap().clone();
        listings.sort_by(|a, b| (a.food_exdate, a.id).cmp(&(b.food_exdate, b.id)));
        listings.truncate(limit.max(0) as usize);
        Ok(listings)
    }

    async fn create_request(&self, new: NewDonationRequest) -> sqlx::Result<InsertAck> {
        let id = Uuid::new_v4();
        self.requests.write().unwrap().push(DonationRequest {
            id,
            food_id: new.food_id,
            food_name: new.food_name,
            food_image: new.food_image,
            donator_email: new.donator_email,
            pickup_location: new.pickup_location,
            request_date: new.request_date,
            email: new.email,
            req_status: new.req_status,
        });

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn all_requests(&self) -> sqlx::Result<Vec<DonationRequest>> {
        Ok(self.requests.read().unwrap().clone())
    }

    async fn requests_by_owner(&self, email: Option<&str>) -> sqlx::Result<Vec<DonationRequest>> {
        Ok(self
            .requests
            .read()
            .unwrap()
            .iter()
            .filter(|r| email.is_none_or(|e| r.email == e))
            .cloned()
            .collect())
    }

    async fn set_request_status(&self, id: Uuid, status: &str) -> sqlx::Result<UpdateAck> {
        let mut requests = self.requests.write().unwrap();
        let matched = match requests.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                request.req_status = status.to_string();
                1
            }
            None => 0,
        };

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: matched,
            modified_count: matched,
        })
    }

    async fn delete_request(&self, id: Uuid) -> sqlx::Result<DeleteAck> {
        let mut requests = self.requests.write().unwrap();
        let before = requests.len();
        requests.retain(|r| r.id != id);

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - requests.len()) as u64,
        })
    }
}
