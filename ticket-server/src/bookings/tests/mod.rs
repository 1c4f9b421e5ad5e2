use super::*;

use std::sync::Arc;

use crate::admin::AdminCoordinator;
use crate::auth::CurrentUser;
use crate::db::DbService;
use crate::db::models::{BookingStatus, EventCategory, EventCreate, EventUpdate, Role};
use crate::db::repository::{BookingRepository, EventRepository};
use crate::inventory::InventoryStore;
use crate::utils::time::now_rfc3339;

mod test_admin;
mod test_cancel;
mod test_create;
mod test_reconcile;

const MAX_PER_BOOKING: i64 = 5;

pub(crate) struct TestApp {
    pub db: DbService,
    pub inventory: InventoryStore,
    pub ledger: Arc<BookingLedger>,
    pub coordinator: AdminCoordinator,
    pub events: EventRepository,
    pub bookings: BookingRepository,
}

async fn test_app() -> TestApp {
    let db = DbService::memory().await.unwrap();
    let inventory = InventoryStore::new(db.db.clone());
    let ledger = Arc::new(BookingLedger::new(
        db.db.clone(),
        inventory.clone(),
        MAX_PER_BOOKING,
    ));
    let coordinator = AdminCoordinator::new(db.db.clone(), inventory.clone(), ledger.clone());
    let events = EventRepository::new(db.db.clone());
    let bookings = BookingRepository::new(db.db.clone());
    TestApp {
        db,
        inventory,
        ledger,
        coordinator,
        events,
        bookings,
    }
}

fn customer(name: &str) -> CurrentUser {
    CurrentUser {
        id: format!("user:{name}"),
        name: name.to_string(),
        role: Role::Customer,
    }
}

fn admin() -> CurrentUser {
    CurrentUser {
        id: "user:admin".to_string(),
        name: "Admin".to_string(),
        role: Role::Admin,
    }
}

impl TestApp {
    async fn seed_event(&self, total: i64, price: f64) -> String {
        let now = now_rfc3339();
        let event = self
            .events
            .create(EventCreate {
                name: "Concert".to_string(),
                description: "Live show".to_string(),
                category: EventCategory::Music,
                location: "Main Hall".to_string(),
                date: now.clone(),
                image_url: String::new(),
                ticket_price: price,
                total_tickets: total,
                available_tickets: total,
                created_by: None,
                created_at: now,
            })
            .await
            .unwrap();
        event.id_string()
    }

    async fn available(&self, event_id: &str) -> i64 {
        self.events
            .find_by_id(event_id)
            .await
            .unwrap()
            .unwrap()
            .available_tickets
    }

    /// Write the available count behind the store's back, simulating the
    /// drift a crash between paired writes would leave
    async fn corrupt_available(&self, event_id: &str, value: i64) {
        let thing: surrealdb::RecordId = event_id.parse().unwrap();
        self.db
            .db
            .query("UPDATE $event SET available_tickets = $value")
            .bind(("event", thing))
            .bind(("value", value))
            .await
            .unwrap();
    }

    /// total - available must equal the sum of active booking quantities
    async fn assert_invariant(&self, event_id: &str) {
        let event = self.events.find_by_id(event_id).await.unwrap().unwrap();
        let sold = self.bookings.sum_active_quantity(event_id).await.unwrap();
        assert_eq!(
            event.total_tickets - event.available_tickets,
            sold,
            "capacity invariant violated for {event_id}"
        );
    }
}
