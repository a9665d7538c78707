//! Weekly schedule handlers. Times arrive as "HH:MM" strings and are
//! validated here, at write time; slot computation only ever sees parsed
//! values.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use bookwise_core::conflict::Interval;
use bookwise_core::errors::EngineError;
use bookwise_core::models::schedule::{CreateWeeklyScheduleRequest, WeeklyWindow};
use bookwise_core::time::TimeOfDay;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_weekly_schedule(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateWeeklyScheduleRequest>,
) -> Result<Json<WeeklyWindow>, AppError> {
    if payload.day_of_week > 6 {
        return Err(AppError(EngineError::Validation(format!(
            "day_of_week must be 0..=6, got {}",
            payload.day_of_week
        ))));
    }
    let start = TimeOfDay::parse(&payload.start)?;
    let end = TimeOfDay::parse(&payload.end)?;
    let window = Interval::new(start, end)?;

    bookwise_db::repositories::staff::get_staff_member_by_id(&state.db_pool, payload.staff_id)
        .await
        .map_err(EngineError::Database)?
        .ok_or_else(|| {
            EngineError::NotFound(format!(
                "Staff member with ID {} not found",
                payload.staff_id
            ))
        })?;

    let schedule = bookwise_db::repositories::schedule::create_weekly_schedule(
        &state.db_pool,
        payload.staff_id,
        i32::from(payload.day_of_week),
        i32::from(window.start.minutes()),
        i32::from(window.end.minutes()),
        &payload.service_ids,
    )
    .await
    .map_err(EngineError::Database)?;

    Ok(Json(schedule.into_domain()?))
}

#[axum::debug_handler]
pub async fn deactivate_weekly_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deactivated =
        bookwise_db::repositories::schedule::deactivate_weekly_schedule(&state.db_pool, id)
            .await
            .map_err(EngineError::Database)?;
    if !deactivated {
        return Err(AppError(EngineError::NotFound(format!(
            "Weekly schedule with ID {id} not found"
        ))));
    }
    Ok(StatusCode::NO_CONTENT)
}
