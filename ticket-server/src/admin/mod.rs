//! Administrative Coordinator
//!
//! Thin layer above the inventory store and booking ledger for the
//! cascading effects of admin actions. It only ever issues the same
//! reserve/release operations the ledger uses - it never bypasses the
//! ledger's invariants with direct field writes.

use std::sync::Arc;

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::bookings::{BookingLedger, LedgerError, LedgerResult};
use crate::db::models::{AccountStatus, Booking, Event, User};
use crate::db::repository::{BookingRepository, EventRepository, RepoResult, UserRepository};
use crate::inventory::InventoryStore;

/// Summary of a completed deletion cascade
#[derive(Debug, Clone, Serialize)]
pub struct EventDeletion {
    pub event_id: String,
    pub cancelled_bookings: usize,
}

pub struct AdminCoordinator {
    ledger: Arc<BookingLedger>,
    inventory: InventoryStore,
    events: EventRepository,
    bookings: BookingRepository,
    users: UserRepository,
    /// Injected cascade failure, index of the cancel that fails
    #[cfg(test)]
    pub(crate) fail_cancel_at: Option<usize>,
}

impl AdminCoordinator {
    pub fn new(db: Surreal<Db>, inventory: InventoryStore, ledger: Arc<BookingLedger>) -> Self {
        Self {
            ledger,
            inventory,
            events: EventRepository::new(db.clone()),
            bookings: BookingRepository::new(db.clone()),
            users: UserRepository::new(db),
            #[cfg(test)]
            fail_cancel_at: None,
        }
    }

    /// Change an event's total capacity
    ///
    /// Refused (never silently adjusted) when the new total is below the
    /// tickets already sold; the sold count rides along in the error.
    pub async fn set_capacity(&self, event_id: &str, new_total: i64) -> LedgerResult<Event> {
        if new_total < 1 {
            return Err(LedgerError::InvalidQuantity { given: new_total });
        }
        self.ledger.ensure_unfrozen(event_id)?;
        let event = self.inventory.set_total(event_id, new_total).await?;
        Ok(event)
    }

    /// Delete an event, cancelling every active booking first
    ///
    /// Each cancel goes through the ledger so the capacity invariant
    /// holds at every step. If any cancel fails, the cancels already
    /// performed are compensated back and the deletion aborts - no
    /// booking is left pointing at a deleted event, and no booking is
    /// left cancelled by a deletion that did not happen.
    pub async fn delete_event(&self, event_id: &str) -> LedgerResult<EventDeletion> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| LedgerError::EventNotFound(event_id.to_string()))?;

        let active = self.bookings.find_active_by_event(event_id).await?;
        tracing::info!(
            event = %event_id,
            name = %event.name,
            active_bookings = active.len(),
            "Deleting event, cascading cancellation"
        );

        let mut completed: Vec<Booking> = Vec::new();
        for (index, booking) in active.iter().enumerate() {
            if self.should_inject_failure(index) {
                self.rollback_cascade(event_id, &completed).await;
                return Err(LedgerError::Database(
                    "injected cascade failure".to_string(),
                ));
            }

            match self.ledger.cancel_internal(booking, booking.quantity).await {
                Ok(_) => completed.push(booking.clone()),
                // Raced with the holder's own cancel; already off the books
                Err(LedgerError::AlreadyCancelled) => {}
                Err(e) => {
                    tracing::warn!(
                        event = %event_id,
                        booking = %booking.id_string(),
                        error = %e,
                        "Cascade cancel failed, aborting deletion"
                    );
                    self.rollback_cascade(event_id, &completed).await;
                    return Err(e);
                }
            }
        }

        match self.events.delete(event_id).await {
            Ok(true) => {
                tracing::info!(
                    event = %event_id,
                    cancelled = completed.len(),
                    "Event deleted"
                );
                Ok(EventDeletion {
                    event_id: event_id.to_string(),
                    cancelled_bookings: completed.len(),
                })
            }
            Ok(false) => {
                self.rollback_cascade(event_id, &completed).await;
                Err(LedgerError::EventNotFound(event_id.to_string()))
            }
            Err(e) => {
                self.rollback_cascade(event_id, &completed).await;
                Err(LedgerError::Database(e.to_string()))
            }
        }
    }

    /// Suspend or reactivate an account
    ///
    /// Identity-level only: a disabled holder cannot log in again, but
    /// their existing bookings stay valid and visible.
    pub async fn set_account_status(
        &self,
        user_id: &str,
        status: AccountStatus,
    ) -> RepoResult<User> {
        let user = self.users.set_account_status(user_id, status).await?;
        tracing::info!(user = %user_id, status = ?status, "Account status changed");
        Ok(user)
    }

    #[cfg(test)]
    fn should_inject_failure(&self, index: usize) -> bool {
        self.fail_cancel_at == Some(index)
    }

    #[cfg(not(test))]
    fn should_inject_failure(&self, _index: usize) -> bool {
        false
    }

    /// Undo the cancels a failed cascade already performed, newest first
    async fn rollback_cascade(&self, event_id: &str, completed: &[Booking]) {
        for prior in completed.iter().rev() {
            match self.inventory.reserve(event_id, prior.quantity).await {
                Ok(()) => {
                    if let Err(e) = self.bookings.restore(prior).await {
                        self.ledger.freeze(
                            event_id,
                            &format!(
                                "cascade rollback could not restore {}: {}",
                                prior.id_string(),
                                e
                            ),
                        );
                        return;
                    }
                }
                Err(e) => {
                    self.ledger.freeze(
                        event_id,
                        &format!("cascade rollback could not re-reserve: {}", e),
                    );
                    return;
                }
            }
        }
        tracing::info!(
            event = %event_id,
            restored = completed.len(),
            "Deletion cascade rolled back"
        );
    }
}
