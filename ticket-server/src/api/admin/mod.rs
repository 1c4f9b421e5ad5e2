//! Admin API 模块
//!
//! 全部路由按能力分组做中间件门控。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{Capability, require_capability};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    let reports = Router::new()
        .route("/stats", get(handler::stats))
        .route("/bookings", get(handler::list_bookings))
        .layer(middleware::from_fn(require_capability(
            Capability::ViewReports,
        )));

    let users = Router::new()
        .route("/users", get(handler::list_users))
        .route("/users/{id}/status", put(handler::set_user_status))
        .layer(middleware::from_fn(require_capability(
            Capability::ManageUsers,
        )));

    let operations = Router::new()
        .route("/events/{id}/reconcile", post(handler::reconcile_event))
        .layer(middleware::from_fn(require_capability(
            Capability::ManageEvents,
        )));

    reports.merge(users).merge(operations)
}
