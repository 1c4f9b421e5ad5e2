//! Repository Module
//!
//! CRUD operations for SurrealDB tables. One repository per entity; all
//! share [`BaseRepository`] for the database handle.
//!
//! ID convention: the full "table:id" string format is used across the
//! stack. Parse with `let id: RecordId = "event:abc".parse()?` and pass
//! `RecordId` values straight into `select`/`update`/`delete`.

pub mod booking;
pub mod event;
pub mod user;

pub use booking::{BookingRepository, CancelWrite};
pub use event::{EventFilter, EventRepository};
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as "index ... already contains"
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Row shape for `SELECT count() AS total ... GROUP ALL`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub total: i64,
}

/// Row shape for integer `SELECT math::sum(..) AS sum ... GROUP ALL`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct QuantitySumRow {
    pub sum: i64,
}

/// Row shape for monetary `SELECT math::sum(..) AS sum ... GROUP ALL`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct RevenueSumRow {
    pub sum: f64,
}
