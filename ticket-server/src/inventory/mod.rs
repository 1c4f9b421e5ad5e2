//! Inventory Store
//!
//! Owns the authoritative `total_tickets` / `available_tickets` pair per
//! event. Exposes exactly three capacity-changing primitives; every other
//! component goes through them, never through a plain field write.
//!
//! Each primitive is a single conditional `UPDATE` against one event
//! record, so the check and the mutation are indivisible and two racing
//! reservations for the last unit cannot both pass. Different events
//! never share a serialization point. The local engine is optimistic
//! about concurrent writers, so a lost race surfaces as a retryable
//! conflict error rather than a lost update; the store absorbs those
//! with a bounded retry.

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::models::Event;

/// Bounded retry budget for engine write conflicts
const CONFLICT_RETRIES: u32 = 5;

/// Inventory error types
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Event {0} not found")]
    EventNotFound(String),

    /// Reserve found fewer tickets than requested; retryable with a
    /// smaller quantity
    #[error("Insufficient capacity")]
    InsufficientCapacity,

    /// Capacity edit would undersell; carries the current sold count so
    /// the caller can present a precise error
    #[error("{sold} tickets already sold")]
    BelowSoldCount { sold: i64 },

    /// Fatal: a release would overshoot total capacity. Never corrected
    /// inline - the caller must freeze the event and reconcile.
    #[error("Consistency violation: {0}")]
    Consistency(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Inventory store over the embedded database
#[derive(Clone)]
pub struct InventoryStore {
    db: Surreal<Db>,
}

impl InventoryStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Atomically take `amount` tickets from the event
    ///
    /// Succeeds iff `available_tickets >= amount` at the moment of the
    /// check-and-decrement. On failure nothing changes.
    pub async fn reserve(&self, event_id: &str, amount: i64) -> InventoryResult<()> {
        let updated = self
            .guarded_update(
                event_id,
                "UPDATE $event SET available_tickets -= $value \
                 WHERE available_tickets >= $value RETURN AFTER",
                amount,
            )
            .await?;

        match updated {
            Some(event) => {
                tracing::debug!(
                    event = %event_id,
                    amount,
                    available = event.available_tickets,
                    "Reserved tickets"
                );
                Ok(())
            }
            None => {
                if self.load(event_id).await?.is_none() {
                    Err(InventoryError::EventNotFound(event_id.to_string()))
                } else {
                    Err(InventoryError::InsufficientCapacity)
                }
            }
        }
    }

    /// Atomically return `amount` tickets to the event
    ///
    /// A release that would push `available_tickets` past `total_tickets`
    /// indicates a caller bug; it is refused and reported as a fatal
    /// consistency error, never clamped away.
    pub async fn release(&self, event_id: &str, amount: i64) -> InventoryResult<()> {
        let updated = self
            .guarded_update(
                event_id,
                "UPDATE $event SET available_tickets += $value \
                 WHERE available_tickets + $value <= total_tickets RETURN AFTER",
                amount,
            )
            .await?;

        match updated {
            Some(event) => {
                tracing::debug!(
                    event = %event_id,
                    amount,
                    available = event.available_tickets,
                    "Released tickets"
                );
                Ok(())
            }
            None => match self.load(event_id).await? {
                None => Err(InventoryError::EventNotFound(event_id.to_string())),
                Some(event) => Err(InventoryError::Consistency(format!(
                    "release of {} on {} would overshoot total {} (available {})",
                    amount, event_id, event.total_tickets, event.available_tickets
                ))),
            },
        }
    }

    /// Change total capacity, preserving the sold count
    ///
    /// `available_tickets` becomes `new_total - sold`. Fails with
    /// [`InventoryError::BelowSoldCount`] when the sold count exceeds the
    /// new total.
    pub async fn set_total(&self, event_id: &str, new_total: i64) -> InventoryResult<Event> {
        let updated = self
            .guarded_update(
                event_id,
                "UPDATE $event SET \
                 available_tickets = $value - (total_tickets - available_tickets), \
                 total_tickets = $value \
                 WHERE total_tickets - available_tickets <= $value RETURN AFTER",
                new_total,
            )
            .await?;

        match updated {
            Some(event) => {
                tracing::info!(
                    event = %event_id,
                    total = event.total_tickets,
                    available = event.available_tickets,
                    "Total capacity changed"
                );
                Ok(event)
            }
            None => match self.load(event_id).await? {
                None => Err(InventoryError::EventNotFound(event_id.to_string())),
                Some(event) => Err(InventoryError::BelowSoldCount { sold: event.sold() }),
            },
        }
    }

    /// Overwrite `available_tickets` with a recomputed value
    ///
    /// Reconciliation-only escape hatch; everything else must use the
    /// three primitives above.
    pub(crate) async fn force_available(
        &self,
        event_id: &str,
        value: i64,
    ) -> InventoryResult<Event> {
        let updated = self
            .guarded_update(
                event_id,
                "UPDATE $event SET available_tickets = $value RETURN AFTER",
                value,
            )
            .await?;
        updated.ok_or_else(|| InventoryError::EventNotFound(event_id.to_string()))
    }

    async fn load(&self, event_id: &str) -> InventoryResult<Option<Event>> {
        let thing = parse_event_id(event_id)?;
        let event: Option<Event> = self
            .db
            .select(thing)
            .await
            .map_err(|e| InventoryError::Database(e.to_string()))?;
        Ok(event)
    }

    /// Run one conditional update with bounded write-conflict retry
    async fn guarded_update(
        &self,
        event_id: &str,
        query: &'static str,
        value: i64,
    ) -> InventoryResult<Option<Event>> {
        let thing = parse_event_id(event_id)?;
        let mut attempt: u32 = 0;

        loop {
            let outcome = async {
                let mut result = self
                    .db
                    .query(query)
                    .bind(("event", thing.clone()))
                    .bind(("value", value))
                    .await?;
                let events: Vec<Event> = result.take(0)?;
                Ok::<_, surrealdb::Error>(events.into_iter().next())
            }
            .await;

            match outcome {
                Ok(event) => return Ok(event),
                Err(e) if is_write_conflict(&e) && attempt < CONFLICT_RETRIES => {
                    attempt += 1;
                    tracing::debug!(event = %event_id, attempt, "Write conflict, retrying");
                    tokio::time::sleep(Duration::from_millis(5 * attempt as u64)).await;
                }
                Err(e) => return Err(InventoryError::Database(e.to_string())),
            }
        }
    }
}

fn parse_event_id(event_id: &str) -> InventoryResult<surrealdb::RecordId> {
    event_id
        .parse()
        .map_err(|_| InventoryError::EventNotFound(event_id.to_string()))
}

fn is_write_conflict(e: &surrealdb::Error) -> bool {
    let msg = e.to_string().to_lowercase();
    msg.contains("conflict") || msg.contains("try again") || msg.contains("retry")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{EventCategory, EventCreate};
    use crate::db::repository::EventRepository;
    use chrono::{SecondsFormat, Utc};

    async fn store_with_event(total: i64) -> (InventoryStore, EventRepository, String) {
        let db = DbService::memory().await.unwrap();
        let repo = EventRepository::new(db.db.clone());
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let event = repo
            .create(EventCreate {
                name: "Test Event".to_string(),
                description: "Test".to_string(),
                category: EventCategory::Music,
                location: "Test Hall".to_string(),
                date: now.clone(),
                image_url: String::new(),
                ticket_price: 25.0,
                total_tickets: total,
                available_tickets: total,
                created_by: None,
                created_at: now,
            })
            .await
            .unwrap();
        let id = event.id_string();
        (InventoryStore::new(db.db.clone()), repo, id)
    }

    #[tokio::test]
    async fn reserve_decrements_until_sold_out() {
        let (store, repo, id) = store_with_event(3).await;

        store.reserve(&id, 2).await.unwrap();
        let event = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 1);

        // one left, asking for two must not change anything
        let err = store.reserve(&id, 2).await.unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientCapacity));
        let event = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 1);

        store.reserve(&id, 1).await.unwrap();
        let err = store.reserve(&id, 1).await.unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientCapacity));
    }

    #[tokio::test]
    async fn release_restores_reserved_tickets() {
        let (store, repo, id) = store_with_event(10).await;

        store.reserve(&id, 4).await.unwrap();
        store.release(&id, 3).await.unwrap();
        let event = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 9);
    }

    #[tokio::test]
    async fn overshooting_release_is_a_consistency_error() {
        let (store, repo, id) = store_with_event(5).await;

        store.reserve(&id, 1).await.unwrap();
        let err = store.release(&id, 2).await.unwrap_err();
        assert!(matches!(err, InventoryError::Consistency(_)));

        // refused, not clamped - nothing changed
        let event = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 4);
    }

    #[tokio::test]
    async fn set_total_preserves_sold_count() {
        let (store, repo, id) = store_with_event(100).await;
        store.reserve(&id, 40).await.unwrap();

        // floor: 40 sold, cannot go to 39
        let err = store.set_total(&id, 39).await.unwrap_err();
        match err {
            InventoryError::BelowSoldCount { sold } => assert_eq!(sold, 40),
            other => panic!("unexpected error: {other:?}"),
        }

        // 41 leaves exactly one available
        let event = store.set_total(&id, 41).await.unwrap();
        assert_eq!(event.total_tickets, 41);
        assert_eq!(event.available_tickets, 1);

        let event = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(event.sold(), 40);
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let (store, _repo, _id) = store_with_event(1).await;
        let err = store.reserve("event:missing", 1).await.unwrap_err();
        assert!(matches!(err, InventoryError::EventNotFound(_)));
    }
}
