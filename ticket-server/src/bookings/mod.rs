//! Booking Ledger
//!
//! Owns booking records, their state machine and quantity math. Every
//! transition is paired with the matching inventory store call and the
//! two are never allowed to diverge:
//!
//! - create: reserve first; a failed booking write is undone by a
//!   compensating release before the error surfaces
//! - cancel: release first; the booking write is guarded on the expected
//!   pre-state, and a lost guard is undone by a compensating re-reserve
//! - a compensation that itself fails freezes the event and raises the
//!   consistency alert; [`BookingLedger::reconcile`] recomputes the
//!   available count from active bookings, repairs drift and unfreezes
//!
//! # Create Flow
//!
//! ```text
//! create_booking(event, holder, qty)
//!     ├─ 1. Policy checks (qty >= 1, qty <= max per booking)
//!     ├─ 2. Frozen-event check
//!     ├─ 3. Load event (price snapshot)
//!     ├─ 4. InventoryStore::reserve   ── SoldOut on insufficient
//!     ├─ 5. Persist booking (regenerate ticket code on collision)
//!     └─ 6. On persist failure: compensating release, then error
//! ```

pub mod code;
mod error;

#[cfg(test)]
mod tests;

pub use error::{LedgerError, LedgerResult};

use dashmap::DashMap;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{Capability, CurrentUser};
use crate::consistency_alert;
use crate::db::models::{Booking, BookingCreate, BookingStatus};
use crate::db::repository::{BookingRepository, CancelWrite, EventRepository, RepoError};
use crate::inventory::{InventoryError, InventoryStore};
use crate::utils::time::now_rfc3339;

/// Retry budget for ticket code collisions before giving up
const TICKET_CODE_ATTEMPTS: u32 = 8;

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub event_id: String,
    pub total_tickets: i64,
    pub stored_available: i64,
    pub computed_available: i64,
    pub drift: i64,
    pub repaired: bool,
    pub frozen: bool,
}

/// Booking ledger over the embedded database
pub struct BookingLedger {
    inventory: InventoryStore,
    bookings: BookingRepository,
    events: EventRepository,
    /// Events paused after a consistency violation, reason per event.
    /// Mutations are refused until [`BookingLedger::reconcile`] clears
    /// the entry.
    frozen: DashMap<String, String>,
    max_per_booking: i64,
}

impl BookingLedger {
    pub fn new(db: Surreal<Db>, inventory: InventoryStore, max_per_booking: i64) -> Self {
        Self {
            inventory,
            bookings: BookingRepository::new(db.clone()),
            events: EventRepository::new(db),
            frozen: DashMap::new(),
            max_per_booking,
        }
    }

    /// Create a booking for `quantity` tickets of the event
    ///
    /// Exactly one capacity reservation per success, zero on every
    /// rejection path. `unit_price` is snapshotted from the event at this
    /// moment and never tracks later price edits.
    pub async fn create_booking(
        &self,
        event_id: &str,
        holder: &CurrentUser,
        quantity: i64,
    ) -> LedgerResult<Booking> {
        if quantity < 1 {
            return Err(LedgerError::InvalidQuantity { given: quantity });
        }
        if quantity > self.max_per_booking {
            return Err(LedgerError::TooManyUnits {
                max: self.max_per_booking,
            });
        }
        self.ensure_unfrozen(event_id)?;

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| LedgerError::EventNotFound(event_id.to_string()))?;
        let unit_price = event.ticket_price;

        match self.inventory.reserve(event_id, quantity).await {
            Ok(()) => {}
            Err(InventoryError::Consistency(msg)) => {
                self.freeze(event_id, &msg);
                return Err(LedgerError::Consistency(msg));
            }
            Err(e) => return Err(e.into()),
        }

        // Capacity is ours from here on: the booking write either lands
        // exactly once or the reservation is compensated away.
        let created_at = now_rfc3339();
        for _ in 0..TICKET_CODE_ATTEMPTS {
            let data = BookingCreate {
                ticket_code: code::generate(),
                event: event_id.to_string(),
                holder: holder.id.clone(),
                quantity,
                cancelled_quantity: 0,
                unit_price,
                amount_due: unit_price * quantity as f64,
                status: BookingStatus::Confirmed,
                created_at: created_at.clone(),
                cancelled_at: None,
            };
            match self.bookings.create(data).await {
                Ok(booking) => {
                    tracing::info!(
                        booking = %booking.id_string(),
                        event = %event_id,
                        holder = %holder.id,
                        quantity,
                        "Booking created"
                    );
                    return Ok(booking);
                }
                // Ticket code collision: regenerate, never surface a
                // spurious duplicate error
                Err(RepoError::Duplicate(_)) => continue,
                Err(e) => {
                    self.compensate_release(event_id, quantity).await;
                    return Err(LedgerError::Database(e.to_string()));
                }
            }
        }

        self.compensate_release(event_id, quantity).await;
        Err(LedgerError::Database(
            "Ticket code generation exhausted".to_string(),
        ))
    }

    /// Cancel `cancel_qty` tickets of a booking
    ///
    /// Holder-only, unless the actor holds [`Capability::CancelAnyBooking`]
    /// (the administrative cascade path).
    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        actor: &CurrentUser,
        cancel_qty: i64,
    ) -> LedgerResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| LedgerError::BookingNotFound(booking_id.to_string()))?;

        if booking.holder != actor.id && !actor.can(Capability::CancelAnyBooking) {
            return Err(LedgerError::NotBookingHolder);
        }

        self.cancel_internal(&booking, cancel_qty).await
    }

    /// Cancel without the holder check - administrative cascades only
    pub(crate) async fn cancel_internal(
        &self,
        booking: &Booking,
        cancel_qty: i64,
    ) -> LedgerResult<Booking> {
        let event_id = booking.event.clone();
        self.ensure_unfrozen(&event_id)?;

        if booking.status == BookingStatus::Cancelled {
            return Err(LedgerError::AlreadyCancelled);
        }
        if cancel_qty < 1 || cancel_qty > booking.quantity {
            return Err(LedgerError::InvalidQuantity { given: cancel_qty });
        }

        // Release first. The booking write below is guarded on the
        // pre-state; losing that guard means a concurrent transition won,
        // and the release is taken back so the pair nets out to nothing.
        match self.inventory.release(&event_id, cancel_qty).await {
            Ok(()) => {}
            Err(InventoryError::Consistency(msg)) => {
                // A racing cancel may have finished between our state
                // check and the release; re-read before declaring the
                // store corrupt.
                let current = self.bookings.find_by_id(&booking.id_string()).await?;
                if let Some(current) = current
                    && (current.status == BookingStatus::Cancelled
                        || current.quantity != booking.quantity)
                {
                    return Err(LedgerError::AlreadyCancelled);
                }
                self.freeze(&event_id, &msg);
                return Err(LedgerError::Consistency(msg));
            }
            Err(e) => return Err(e.into()),
        }

        let remaining = booking.quantity - cancel_qty;
        let write = if remaining == 0 {
            CancelWrite {
                quantity: 0,
                cancelled_quantity: booking.cancelled_quantity + cancel_qty,
                amount_due: 0.0,
                status: BookingStatus::Cancelled,
                cancelled_at: Some(now_rfc3339()),
            }
        } else {
            CancelWrite {
                quantity: remaining,
                cancelled_quantity: booking.cancelled_quantity + cancel_qty,
                amount_due: booking.unit_price * remaining as f64,
                status: BookingStatus::PartiallyCancelled,
                cancelled_at: None,
            }
        };

        let id = booking
            .id
            .clone()
            .ok_or_else(|| LedgerError::Database("Booking has no id".to_string()))?;

        match self.bookings.apply_cancel(&id, booking.quantity, write).await {
            Ok(Some(updated)) => {
                tracing::info!(
                    booking = %updated.id_string(),
                    event = %event_id,
                    cancel_qty,
                    remaining = updated.quantity,
                    status = ?updated.status,
                    "Booking cancelled"
                );
                Ok(updated)
            }
            Ok(None) => {
                self.compensate_reserve(&event_id, cancel_qty).await?;
                Err(LedgerError::AlreadyCancelled)
            }
            Err(e) => {
                self.compensate_reserve(&event_id, cancel_qty).await?;
                Err(LedgerError::Database(e.to_string()))
            }
        }
    }

    /// Recompute `available_tickets` from first principles and repair
    /// drift. Idempotent; clears the frozen flag on success.
    pub async fn reconcile(&self, event_id: &str) -> LedgerResult<ReconcileReport> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| LedgerError::EventNotFound(event_id.to_string()))?;

        let sold = self.bookings.sum_active_quantity(event_id).await?;
        let computed = event.total_tickets - sold;
        let stored = event.available_tickets;
        let drift = computed - stored;

        if computed < 0 {
            // Active bookings exceed total capacity; no available count
            // can satisfy the invariant. Keep the event frozen.
            self.freeze(
                event_id,
                &format!(
                    "active bookings hold {} of {} total tickets",
                    sold, event.total_tickets
                ),
            );
            return Ok(ReconcileReport {
                event_id: event_id.to_string(),
                total_tickets: event.total_tickets,
                stored_available: stored,
                computed_available: computed,
                drift,
                repaired: false,
                frozen: true,
            });
        }

        if drift != 0 {
            consistency_alert!(
                event = event_id.to_string(),
                stored = stored,
                computed = computed,
                reason = "available count drifted from active booking sum".to_string()
            );
            self.inventory.force_available(event_id, computed).await?;
            tracing::info!(event = %event_id, stored, computed, "Available count repaired");
        }

        self.frozen.remove(event_id);
        Ok(ReconcileReport {
            event_id: event_id.to_string(),
            total_tickets: event.total_tickets,
            stored_available: stored,
            computed_available: computed,
            drift,
            repaired: drift != 0,
            frozen: false,
        })
    }

    /// Whether the event is paused pending reconciliation
    pub fn is_frozen(&self, event_id: &str) -> bool {
        self.frozen.contains_key(event_id)
    }

    pub(crate) fn freeze(&self, event_id: &str, reason: &str) {
        consistency_alert!(event = event_id.to_string(), reason = reason.to_string());
        self.frozen.insert(event_id.to_string(), reason.to_string());
    }

    pub(crate) fn ensure_unfrozen(&self, event_id: &str) -> LedgerResult<()> {
        if self.frozen.contains_key(event_id) {
            return Err(LedgerError::EventFrozen(event_id.to_string()));
        }
        Ok(())
    }

    /// Undo a reservation after a failed booking write
    async fn compensate_release(&self, event_id: &str, quantity: i64) {
        if let Err(e) = self.inventory.release(event_id, quantity).await {
            self.freeze(
                event_id,
                &format!("compensating release of {} failed: {}", quantity, e),
            );
        }
    }

    /// Undo a release after a lost booking-write guard
    async fn compensate_reserve(&self, event_id: &str, quantity: i64) -> LedgerResult<()> {
        if let Err(e) = self.inventory.reserve(event_id, quantity).await {
            let reason = format!("compensating re-reserve of {} failed: {}", quantity, e);
            self.freeze(event_id, &reason);
            return Err(LedgerError::Consistency(reason));
        }
        Ok(())
    }
}
