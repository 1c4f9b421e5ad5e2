//! Booking Repository
//!
//! Persistence for booking records. State-machine math lives in the
//! ledger; this layer executes guarded writes so a transition only lands
//! when the record is still in the state the ledger computed it from.

use super::{BaseRepository, CountRow, QuantitySumRow, RepoError, RepoResult, RevenueSumRow};
use crate::db::models::{Booking, BookingCreate, BookingStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Precomputed cancellation write, applied only if the record still
/// matches the expected pre-state
#[derive(Debug, Clone)]
pub struct CancelWrite {
    pub quantity: i64,
    pub cancelled_quantity: i64,
    pub amount_due: f64,
    pub status: BookingStatus,
    pub cancelled_at: Option<String>,
}

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new booking
    ///
    /// `ticket_code` uniqueness is enforced by the storage-level unique
    /// index; a collision comes back as [`RepoError::Duplicate`] so the
    /// ledger can regenerate and retry.
    pub async fn create(&self, data: BookingCreate) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create("booking").content(data).await?;
        created.ok_or_else(|| RepoError::Database("Booking create returned no record".to_string()))
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// All bookings of a holder, newest first
    pub async fn find_by_holder(&self, holder: &str) -> RepoResult<Vec<Booking>> {
        let holder_owned = holder.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE holder = $holder ORDER BY created_at DESC")
            .bind(("holder", holder_owned))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings)
    }

    /// Active bookings of an event (everything still counted against
    /// capacity)
    pub async fn find_active_by_event(&self, event: &str) -> RepoResult<Vec<Booking>> {
        let event_owned = event.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE event = $event AND status != 'CANCELLED' \
                 ORDER BY created_at ASC",
            )
            .bind(("event", event_owned))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings)
    }

    /// Sum of active quantities for an event - the first-principles side
    /// of the capacity invariant
    pub async fn sum_active_quantity(&self, event: &str) -> RepoResult<i64> {
        let event_owned = event.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(quantity) AS sum FROM booking \
                 WHERE event = $event AND status != 'CANCELLED' GROUP ALL",
            )
            .bind(("event", event_owned))
            .await?;
        let rows: Vec<QuantitySumRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.sum).unwrap_or(0))
    }

    /// All bookings, newest first (admin listing)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Booking>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM booking ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit.max(1)))
            .bind(("offset", offset.max(0)))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings)
    }

    /// Recent bookings (admin dashboard)
    pub async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Booking>> {
        self.find_all(limit, 0).await
    }

    /// Apply a cancellation, guarded on the expected pre-state
    ///
    /// Returns `None` when the guard did not match (the booking was
    /// cancelled or mutated concurrently); the caller must then undo the
    /// capacity release it performed.
    pub async fn apply_cancel(
        &self,
        id: &RecordId,
        expected_quantity: i64,
        write: CancelWrite,
    ) -> RepoResult<Option<Booking>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $booking SET quantity = $quantity, \
                 cancelled_quantity = $cancelled_quantity, amount_due = $amount_due, \
                 status = $status, cancelled_at = $cancelled_at \
                 WHERE status != 'CANCELLED' AND quantity = $expected RETURN AFTER",
            )
            .bind(("booking", id.clone()))
            .bind(("quantity", write.quantity))
            .bind(("cancelled_quantity", write.cancelled_quantity))
            .bind(("amount_due", write.amount_due))
            .bind(("status", write.status))
            .bind(("cancelled_at", write.cancelled_at))
            .bind(("expected", expected_quantity))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// Restore a booking to a previously captured state
    ///
    /// Used by the deletion cascade to undo its own cancels when a later
    /// step fails.
    pub async fn restore(&self, prior: &Booking) -> RepoResult<()> {
        let id = prior
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Booking has no id".to_string()))?;
        self.base
            .db()
            .query(
                "UPDATE $booking SET quantity = $quantity, \
                 cancelled_quantity = $cancelled_quantity, amount_due = $amount_due, \
                 status = $status, cancelled_at = $cancelled_at",
            )
            .bind(("booking", id))
            .bind(("quantity", prior.quantity))
            .bind(("cancelled_quantity", prior.cancelled_quantity))
            .bind(("amount_due", prior.amount_due))
            .bind(("status", prior.status))
            .bind(("cancelled_at", prior.cancelled_at.clone()))
            .await?;
        Ok(())
    }

    /// Total booking count
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM booking GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Booking count for one status
    pub async fn count_by_status(&self, status: BookingStatus) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM booking WHERE status = $status GROUP ALL")
            .bind(("status", status))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Revenue across active bookings
    pub async fn active_revenue(&self) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(amount_due) AS sum FROM booking \
                 WHERE status != 'CANCELLED' GROUP ALL",
            )
            .await?;
        let rows: Vec<RevenueSumRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.sum).unwrap_or(0.0))
    }
}
