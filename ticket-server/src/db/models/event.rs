//! Event Model
//!
//! Inventory-bearing entity. The `total_tickets` / `available_tickets`
//! pair is the authoritative capacity count; it may only be mutated
//! through the inventory store primitives, never by a plain field update.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Event category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventCategory {
    Music,
    Sports,
    Arts,
    Tech,
    Food,
    Business,
    Other,
}

impl std::str::FromStr for EventCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Music" => Ok(Self::Music),
            "Sports" => Ok(Self::Sports),
            "Arts" => Ok(Self::Arts),
            "Tech" => Ok(Self::Tech),
            "Food" => Ok(Self::Food),
            "Business" => Ok(Self::Business),
            "Other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

/// Event entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub location: String,
    /// Event date, RFC 3339 in UTC
    pub date: String,
    /// Artwork URL in the external blob store; never processed here
    #[serde(default)]
    pub image_url: String,
    /// Per-unit price; bookings snapshot this at creation time
    pub ticket_price: f64,
    pub total_tickets: i64,
    pub available_tickets: i64,
    /// Admin account that created the event, "user:id" format
    pub created_by: Option<String>,
    pub created_at: String,
}

/// Data for creating an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub location: String,
    pub date: String,
    pub image_url: String,
    pub ticket_price: f64,
    pub total_tickets: i64,
    pub available_tickets: i64,
    pub created_by: Option<String>,
    pub created_at: String,
}

/// Detail edits only - capacity changes go through the inventory store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub image_url: Option<String>,
    pub ticket_price: Option<f64>,
}

impl Event {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// Tickets currently held by active bookings
    pub fn sold(&self) -> i64 {
        self.total_tickets - self.available_tickets
    }
}
