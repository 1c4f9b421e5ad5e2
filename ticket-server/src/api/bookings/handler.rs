//! Booking API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::AppError;
use crate::api::convert::{BookingWithEvent, EventSummary};
use crate::api::{AppResponse, AppResult};
use crate::auth::{Capability, CurrentUser};
use crate::core::ServerState;
use crate::db::models::Booking;
use crate::db::repository::{BookingRepository, EventRepository};
use crate::utils::ok_with_message;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub event_id: String,
    pub quantity: i64,
}

/// Create a booking
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<Json<Booking>> {
    user.require(Capability::CreateBooking)?;

    let booking = state
        .ledger
        .create_booking(&req.event_id, &user, req.quantity)
        .await?;
    Ok(Json(booking))
}

/// List the caller's bookings, newest first, with event summaries
pub async fn list_own(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<BookingWithEvent>>> {
    let bookings = BookingRepository::new(state.db.clone())
        .find_by_holder(&user.id)
        .await?;
    let with_events = attach_events(&state, bookings).await?;
    Ok(Json(with_events))
}

/// Get one booking - holder only, unless the caller may view reports
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = BookingRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {} not found", id)))?;

    if booking.holder != user.id && !user.can(Capability::ViewReports) {
        return Err(AppError::forbidden("Not your booking".to_string()));
    }
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub cancel_quantity: i64,
}

/// Cancel tickets of a booking (partial or full)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<CancelBookingRequest>,
) -> AppResult<Json<AppResponse<Booking>>> {
    let booking = state
        .ledger
        .cancel_booking(&id, &user, req.cancel_quantity)
        .await?;

    Ok(ok_with_message(
        booking,
        format!("{} ticket(s) cancelled successfully", req.cancel_quantity),
    ))
}

/// Join bookings with compact event payloads
pub(crate) async fn attach_events(
    state: &ServerState,
    bookings: Vec<Booking>,
) -> AppResult<Vec<BookingWithEvent>> {
    let events = EventRepository::new(state.db.clone());
    let mut summaries: HashMap<String, Option<EventSummary>> = HashMap::new();

    let mut result = Vec::with_capacity(bookings.len());
    for booking in bookings {
        if !summaries.contains_key(&booking.event) {
            // deleted events leave the summary empty rather than failing
            // the listing
            let summary = events.find_by_id(&booking.event).await?.map(Into::into);
            summaries.insert(booking.event.clone(), summary);
        }
        let event_details = summaries.get(&booking.event).cloned().flatten();
        result.push(BookingWithEvent {
            booking,
            event_details,
        });
    }
    Ok(result)
}
