use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::create_booking))
        .route("/api/bookings/:id", get(handlers::booking::get_booking))
        .route(
            "/api/bookings/:id/confirm",
            post(handlers::booking::confirm_booking),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::booking::cancel_booking),
        )
        .route(
            "/api/bookings/:id/complete",
            post(handlers::booking::complete_booking),
        )
}
