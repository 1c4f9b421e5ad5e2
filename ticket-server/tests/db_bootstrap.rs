//! On-disk database bootstrap coverage
//!
//! The unique indexes are load-bearing (spurious duplicates must come
//! from the storage layer, not from generation entropy), so exercise
//! them against the real RocksDB engine rather than the in-memory one.

use tempfile::tempdir;
use ticket_server::db::DbService;
use ticket_server::db::models::{AccountStatus, BookingCreate, BookingStatus, Role, UserCreate};
use ticket_server::db::repository::{BookingRepository, RepoError, UserRepository};
use ticket_server::utils::time::now_rfc3339;

fn user(email: &str) -> UserCreate {
    UserCreate {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "not-a-real-hash".to_string(),
        role: Role::Customer,
        account_status: AccountStatus::Active,
        phone: String::new(),
        address: String::new(),
        profile_image: String::new(),
        last_login: None,
        created_at: now_rfc3339(),
    }
}

fn booking(ticket_code: &str) -> BookingCreate {
    BookingCreate {
        ticket_code: ticket_code.to_string(),
        event: "event:test".to_string(),
        holder: "user:test".to_string(),
        quantity: 1,
        cancelled_quantity: 0,
        unit_price: 10.0,
        amount_due: 10.0,
        status: BookingStatus::Confirmed,
        created_at: now_rfc3339(),
        cancelled_at: None,
    }
}

#[tokio::test]
async fn on_disk_bootstrap_enforces_unique_indexes() {
    let dir = tempdir().unwrap();
    let db = DbService::new(dir.path().to_str().unwrap()).await.unwrap();

    let users = UserRepository::new(db.db.clone());
    users.create(user("dup@example.com")).await.unwrap();
    let err = users.create(user("dup@example.com")).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    let bookings = BookingRepository::new(db.db.clone());
    bookings.create(booking("ABCD1234")).await.unwrap();
    let err = bookings.create(booking("ABCD1234")).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // different code goes through
    bookings.create(booking("EFGH5678")).await.unwrap();
}
