//! Event API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::admin::EventDeletion;
use crate::api::{AppResponse, AppResult};
use crate::auth::{Capability, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{Event, EventCategory, EventCreate, EventUpdate};
use crate::db::repository::{EventFilter, EventRepository};
use crate::utils::ok_with_message;
use crate::utils::time::{normalize_rfc3339, now_rfc3339};

/// Query params for the catalog listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsResponse {
    pub events: Vec<Event>,
    pub total: i64,
    pub has_more: bool,
}

/// List upcoming events with optional category filter and search
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ListEventsResponse>> {
    // "All" means no category filter
    let category = match query.category.as_deref() {
        None | Some("All") | Some("") => None,
        Some(raw) => Some(
            raw.parse::<EventCategory>()
                .map_err(|_| AppError::validation(format!("Unknown category: {}", raw)))?,
        ),
    };

    let repo = EventRepository::new(state.db.clone());
    let (events, total) = repo
        .list(EventFilter {
            category,
            search: query.search.filter(|s| !s.trim().is_empty()),
            upcoming_only: true,
            limit: query.limit.clamp(1, 100),
            offset: query.offset.max(0),
        })
        .await?;

    let has_more = query.offset.max(0) + events.len() as i64 < total;
    Ok(Json(ListEventsResponse {
        events,
        total,
        has_more,
    }))
}

/// Get event by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    let repo = EventRepository::new(state.db.clone());
    let event = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {} not found", id)))?;
    Ok(Json(event))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub date: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub ticket_price: f64,
    pub total_tickets: i64,
}

/// Create event (admin)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<Json<Event>> {
    user.require(Capability::ManageEvents)?;

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Event name is required"));
    }
    if req.description.trim().is_empty() {
        return Err(AppError::validation("Description is required"));
    }
    if req.location.trim().is_empty() {
        return Err(AppError::validation("Location is required"));
    }
    let category: EventCategory = req
        .category
        .parse()
        .map_err(|_| AppError::validation(format!("Unknown category: {}", req.category)))?;
    let date = normalize_rfc3339(&req.date)
        .ok_or_else(|| AppError::validation("Event date must be RFC 3339"))?;
    if !req.ticket_price.is_finite() || req.ticket_price < 0.0 {
        return Err(AppError::validation("Ticket price must be non-negative"));
    }
    if req.total_tickets < 1 {
        return Err(AppError::validation("Total tickets must be at least 1"));
    }

    let repo = EventRepository::new(state.db.clone());
    let event = repo
        .create(EventCreate {
            name,
            description: req.description,
            category,
            location: req.location,
            date,
            image_url: req.image_url.unwrap_or_default(),
            ticket_price: req.ticket_price,
            total_tickets: req.total_tickets,
            // a new event starts fully available
            available_tickets: req.total_tickets,
            created_by: Some(user.id.clone()),
            created_at: now_rfc3339(),
        })
        .await?;

    tracing::info!(event = %event.id_string(), name = %event.name, "Event created");
    Ok(Json(event))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ticket_price: Option<f64>,
    /// Capacity change, routed through the administrative coordinator
    #[serde(default)]
    pub total_tickets: Option<i64>,
}

/// Update event details and/or capacity (admin)
///
/// Price edits never touch existing bookings - their `unit_price` is a
/// snapshot. Capacity edits are refused when they would undersell.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> AppResult<Json<Event>> {
    user.require(Capability::ManageEvents)?;

    let category = match req.category.as_deref() {
        None => None,
        Some(raw) => Some(
            raw.parse::<EventCategory>()
                .map_err(|_| AppError::validation(format!("Unknown category: {}", raw)))?,
        ),
    };
    let date = match req.date.as_deref() {
        None => None,
        Some(raw) => Some(
            normalize_rfc3339(raw)
                .ok_or_else(|| AppError::validation("Event date must be RFC 3339"))?,
        ),
    };
    if let Some(price) = req.ticket_price
        && (!price.is_finite() || price < 0.0)
    {
        return Err(AppError::validation("Ticket price must be non-negative"));
    }

    let repo = EventRepository::new(state.db.clone());
    let mut event = repo
        .update_details(
            &id,
            EventUpdate {
                name: req.name,
                description: req.description,
                category,
                location: req.location,
                date,
                image_url: req.image_url,
                ticket_price: req.ticket_price,
            },
        )
        .await?;

    if let Some(new_total) = req.total_tickets {
        user.require(Capability::EditCapacity)?;
        event = state.coordinator.set_capacity(&id, new_total).await?;
    }

    tracing::info!(event = %id, "Event updated");
    Ok(Json(event))
}

/// Delete event (admin) - cancels every active booking first
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<EventDeletion>>> {
    user.require(Capability::ManageEvents)?;

    let deletion = state.coordinator.delete_event(&id).await?;
    Ok(ok_with_message(deletion, "Event deleted successfully"))
}
