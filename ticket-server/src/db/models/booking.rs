//! Booking Model
//!
//! A holder's claim on some quantity of an event's capacity. Owned
//! exclusively by the booking ledger; every state transition is paired
//! with the matching inventory mutation.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Booking status
///
/// `Cancelled` is terminal. `Pending` is reserved for future use and is
/// accounted as active. State machine:
///
/// ```text
/// Confirmed --cancel(partial)--> PartiallyCancelled
/// Confirmed --cancel(full)-----> Cancelled
/// PartiallyCancelled --cancel(partial)--> PartiallyCancelled
/// PartiallyCancelled --cancel(full)-----> Cancelled
/// Cancelled --(any)--> rejected
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    PartiallyCancelled,
    Cancelled,
}

impl BookingStatus {
    /// Active bookings count against event capacity
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Unique human-shareable code, distinct from the record id
    pub ticket_code: String,
    /// Owning event, "event:id" format
    pub event: String,
    /// Holder account, "user:id" format
    pub holder: String,
    /// Units currently held; decreases on partial cancellation
    pub quantity: i64,
    /// Cumulative cancelled units, kept for auditability
    pub cancelled_quantity: i64,
    /// Price snapshot taken at booking time; later event price edits
    /// must not change it
    pub unit_price: f64,
    /// quantity * unit_price, recomputed whenever quantity changes
    pub amount_due: f64,
    pub status: BookingStatus,
    pub created_at: String,
    pub cancelled_at: Option<String>,
}

/// Data for creating a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub ticket_code: String,
    pub event: String,
    pub holder: String,
    pub quantity: i64,
    pub cancelled_quantity: i64,
    pub unit_price: f64,
    pub amount_due: f64,
    pub status: BookingStatus,
    pub created_at: String,
    pub cancelled_at: Option<String>,
}

impl Booking {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
