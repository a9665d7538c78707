use axum::{
    Router,
    routing::{delete, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/schedules",
            post(handlers::schedule::create_weekly_schedule),
        )
        .route(
            "/api/schedules/:id",
            delete(handlers::schedule::deactivate_weekly_schedule),
        )
}
