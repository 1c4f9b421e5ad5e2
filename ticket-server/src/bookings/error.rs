//! Ledger error types
//!
//! The flat taxonomy the boundary layer maps to user-facing responses.
//! Everything except `Consistency`/`EventFrozen` is a caller error;
//! those two are fatal and pause the event until reconciled.

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::inventory::InventoryError;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Insufficient capacity at reservation time; retryable with a
    /// smaller quantity
    #[error("Not enough tickets available")]
    SoldOut,

    #[error("Maximum {max} tickets allowed per booking")]
    TooManyUnits { max: i64 },

    #[error("Invalid quantity: {given}")]
    InvalidQuantity { given: i64 },

    #[error("Booking already cancelled")]
    AlreadyCancelled,

    /// Capacity edit would undersell; carries the sold count for a
    /// precise error message
    #[error("Cannot reduce total tickets below {sold}. {sold} tickets have already been sold")]
    BelowSoldCount { sold: i64 },

    #[error("Event {0} not found")]
    EventNotFound(String),

    #[error("Booking {0} not found")]
    BookingNotFound(String),

    #[error("Booking belongs to another holder")]
    NotBookingHolder,

    #[error("Event {0} is paused pending reconciliation")]
    EventFrozen(String),

    #[error("Consistency violation: {0}")]
    Consistency(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<InventoryError> for LedgerError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::InsufficientCapacity => LedgerError::SoldOut,
            InventoryError::BelowSoldCount { sold } => LedgerError::BelowSoldCount { sold },
            InventoryError::EventNotFound(id) => LedgerError::EventNotFound(id),
            InventoryError::Consistency(msg) => LedgerError::Consistency(msg),
            InventoryError::Database(msg) => LedgerError::Database(msg),
        }
    }
}

impl From<RepoError> for LedgerError {
    fn from(e: RepoError) -> Self {
        LedgerError::Database(e.to_string())
    }
}
