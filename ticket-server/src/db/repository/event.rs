//! Event Repository
//!
//! Catalog reads and detail edits. Capacity fields are deliberately out
//! of reach here - they belong to the inventory store.

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{Event, EventCategory, EventCreate, EventUpdate};
use crate::utils::time::now_rfc3339;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Catalog listing filter
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub category: Option<EventCategory>,
    /// Case-insensitive match over name/location/description
    pub search: Option<String>,
    /// Only events whose date is still ahead
    pub upcoming_only: bool,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Clone)]
pub struct EventRepository {
    base: BaseRepository,
}

impl EventRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find event by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Event>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let event: Option<Event> = self.base.db().select(thing).await?;
        Ok(event)
    }

    /// List events matching the filter, soonest first, plus the total
    /// match count for pagination
    pub async fn list(&self, filter: EventFilter) -> RepoResult<(Vec<Event>, i64)> {
        let mut conds: Vec<&str> = Vec::new();
        if filter.category.is_some() {
            conds.push("category = $category");
        }
        if filter.search.is_some() {
            conds.push(
                "(string::lowercase(name) CONTAINS $search \
                 OR string::lowercase(location) CONTAINS $search \
                 OR string::lowercase(description) CONTAINS $search)",
            );
        }
        if filter.upcoming_only {
            conds.push("date >= $now");
        }

        let where_clause = if conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conds.join(" AND "))
        };

        let list_query = format!(
            "SELECT * FROM event{} ORDER BY date ASC LIMIT $limit START $offset",
            where_clause
        );
        let count_query = format!("SELECT count() AS total FROM event{} GROUP ALL", where_clause);

        let mut request = self
            .base
            .db()
            .query(list_query)
            .query(count_query)
            .bind(("limit", filter.limit.max(1)))
            .bind(("offset", filter.offset.max(0)))
            .bind(("now", now_rfc3339()));
        if let Some(category) = filter.category {
            request = request.bind(("category", category));
        }
        if let Some(search) = filter.search {
            request = request.bind(("search", search.to_lowercase()));
        }

        let mut result = request.await?;
        let events: Vec<Event> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|r| r.total).unwrap_or(0);
        Ok((events, total))
    }

    /// Upcoming events, soonest first
    pub async fn find_upcoming(&self, limit: i64) -> RepoResult<Vec<Event>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM event WHERE date >= $now ORDER BY date ASC LIMIT $limit")
            .bind(("now", now_rfc3339()))
            .bind(("limit", limit.max(1)))
            .await?;
        let events: Vec<Event> = result.take(0)?;
        Ok(events)
    }

    /// Create a new event
    pub async fn create(&self, data: EventCreate) -> RepoResult<Event> {
        let created: Option<Event> = self.base.db().create("event").content(data).await?;
        created.ok_or_else(|| RepoError::Database("Event create returned no record".to_string()))
    }

    /// Update event details (never the capacity pair)
    pub async fn update_details(&self, id: &str, data: EventUpdate) -> RepoResult<Event> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut sets: Vec<&str> = Vec::new();
        if data.name.is_some() {
            sets.push("name = $name");
        }
        if data.description.is_some() {
            sets.push("description = $description");
        }
        if data.category.is_some() {
            sets.push("category = $category");
        }
        if data.location.is_some() {
            sets.push("location = $location");
        }
        if data.date.is_some() {
            sets.push("date = $date");
        }
        if data.image_url.is_some() {
            sets.push("image_url = $image_url");
        }
        if data.ticket_price.is_some() {
            sets.push("ticket_price = $ticket_price");
        }

        if sets.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Event {} not found", id)));
        }

        let query = format!("UPDATE $thing SET {} RETURN AFTER", sets.join(", "));
        let mut request = self.base.db().query(query).bind(("thing", thing));
        if let Some(name) = data.name {
            request = request.bind(("name", name));
        }
        if let Some(description) = data.description {
            request = request.bind(("description", description));
        }
        if let Some(category) = data.category {
            request = request.bind(("category", category));
        }
        if let Some(location) = data.location {
            request = request.bind(("location", location));
        }
        if let Some(date) = data.date {
            request = request.bind(("date", date));
        }
        if let Some(image_url) = data.image_url {
            request = request.bind(("image_url", image_url));
        }
        if let Some(ticket_price) = data.ticket_price {
            request = request.bind(("ticket_price", ticket_price));
        }

        let mut result = request.await?;
        let events: Vec<Event> = result.take(0)?;
        events
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Event {} not found", id)))
    }

    /// Delete the event record
    ///
    /// Callers are responsible for the booking cascade first; this only
    /// removes the record itself.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let deleted: Option<Event> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }

    /// Total event count
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM event GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
