use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/jobs/auto-complete",
        post(handlers::jobs::trigger_auto_completion),
    )
}
