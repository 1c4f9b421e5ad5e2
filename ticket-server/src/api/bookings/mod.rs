//! Booking API 模块
//!
//! 所有写操作都经过预订台账，处理器从不直接改库存。

mod handler;

pub(crate) use handler::attach_events;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_own).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", put(handler::cancel))
}
