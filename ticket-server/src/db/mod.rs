//! Database Module
//!
//! Embedded SurrealDB storage. Schema bootstrap is a handful of
//! idempotent DEFINE statements; the unique indexes are load-bearing
//! (ticket codes and account emails are enforced here, not by
//! generation entropy).

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "tickets";
const DATABASE: &str = "main";

/// Idempotent schema bootstrap
const SCHEMA: &str = "\
    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;\n\
    DEFINE INDEX IF NOT EXISTS uniq_user_email ON TABLE user COLUMNS email UNIQUE;\n\
    DEFINE TABLE IF NOT EXISTS event SCHEMALESS;\n\
    DEFINE TABLE IF NOT EXISTS booking SCHEMALESS;\n\
    DEFINE INDEX IF NOT EXISTS uniq_booking_ticket_code ON TABLE booking COLUMNS ticket_code UNIQUE;\n\
    DEFINE INDEX IF NOT EXISTS idx_booking_event ON TABLE booking COLUMNS event;\n\
    DEFINE INDEX IF NOT EXISTS idx_booking_holder ON TABLE booking COLUMNS holder;";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database under the given data directory
    pub async fn new(data_dir: &str) -> Result<Self, AppError> {
        let path = format!("{}/db", data_dir);
        let db = Surreal::new::<RocksDb>(path.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        let service = Self { db };
        service.bootstrap().await?;
        tracing::info!(path = %path, "Database opened");
        Ok(service)
    }

    /// Open an in-memory database (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;
        let service = Self { db };
        service.bootstrap().await?;
        Ok(service)
    }

    async fn bootstrap(&self) -> Result<(), AppError> {
        self.db
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;
        self.db
            .query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {}", e)))?
            .check()
            .map_err(|e| AppError::database(format!("Schema bootstrap rejected: {}", e)))?;
        tracing::debug!("Schema bootstrap applied");
        Ok(())
    }
}
