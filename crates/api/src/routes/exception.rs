use axum::{
    Router,
    routing::{delete, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/exceptions",
            post(handlers::exception::apply_schedule_exception),
        )
        .route(
            "/api/exceptions/:id",
            delete(handlers::exception::delete_schedule_exception),
        )
}
