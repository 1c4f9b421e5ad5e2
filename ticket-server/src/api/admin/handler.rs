//! Admin API Handlers
//!
//! Dashboard statistics, global listings, account suspension and the
//! reconciliation entry point.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::api::bookings::attach_events;
use crate::api::convert::{BookingWithEvent, UserInfo};
use crate::api::{AppResponse, AppResult};
use crate::bookings::ReconcileReport;
use crate::core::ServerState;
use crate::db::models::{AccountStatus, BookingStatus, Event};
use crate::db::repository::{BookingRepository, EventRepository, UserRepository};
use crate::utils::ok;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsByStatus {
    pub pending: i64,
    pub confirmed: i64,
    pub partially_cancelled: i64,
    pub cancelled: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_events: i64,
    pub total_bookings: i64,
    /// Revenue across active bookings
    pub total_revenue: f64,
    pub bookings_by_status: BookingsByStatus,
    pub recent_bookings: Vec<BookingWithEvent>,
    pub upcoming_events: Vec<Event>,
}

/// Dashboard statistics
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<StatsResponse>> {
    let users = UserRepository::new(state.db.clone());
    let events = EventRepository::new(state.db.clone());
    let bookings = BookingRepository::new(state.db.clone());

    let total_users = users.count().await?;
    let total_events = events.count().await?;
    let total_bookings = bookings.count().await?;
    let total_revenue = bookings.active_revenue().await?;

    let bookings_by_status = BookingsByStatus {
        pending: bookings.count_by_status(BookingStatus::Pending).await?,
        confirmed: bookings.count_by_status(BookingStatus::Confirmed).await?,
        partially_cancelled: bookings
            .count_by_status(BookingStatus::PartiallyCancelled)
            .await?,
        cancelled: bookings.count_by_status(BookingStatus::Cancelled).await?,
    };

    let recent = bookings.find_recent(5).await?;
    let recent_bookings = attach_events(&state, recent).await?;
    let upcoming_events = events.find_upcoming(5).await?;

    Ok(Json(StatsResponse {
        total_users,
        total_events,
        total_bookings,
        total_revenue,
        bookings_by_status,
        recent_bookings,
        upcoming_events,
    }))
}

/// Query params for the global booking listing
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// All bookings (paginated), with event summaries
pub async fn list_bookings(
    State(state): State<ServerState>,
    Query(query): Query<ListBookingsQuery>,
) -> AppResult<Json<Vec<BookingWithEvent>>> {
    let bookings = BookingRepository::new(state.db.clone())
        .find_all(query.limit.clamp(1, 200), query.offset.max(0))
        .await?;
    let with_events = attach_events(&state, bookings).await?;
    Ok(Json(with_events))
}

/// All user accounts, sanitized
pub async fn list_users(State(state): State<ServerState>) -> AppResult<Json<Vec<UserInfo>>> {
    let users = UserRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserStatusRequest {
    pub account_status: AccountStatus,
}

/// Suspend or reactivate an account
///
/// Identity-level only - the holder's bookings are untouched.
pub async fn set_user_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<SetUserStatusRequest>,
) -> AppResult<Json<UserInfo>> {
    let user = state
        .coordinator
        .set_account_status(&id, req.account_status)
        .await?;
    Ok(Json(user.into()))
}

/// Recompute an event's available count from active bookings, repair
/// drift and unfreeze the event. Idempotent.
pub async fn reconcile_event(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<ReconcileReport>>> {
    let report = state.ledger.reconcile(&id).await?;
    Ok(ok(report))
}
