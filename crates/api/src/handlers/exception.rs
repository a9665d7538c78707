//! # Schedule Exception Handlers
//!
//! A schedule exception overrides a staff member's weekly schedule for one
//! date. Creating a closed-day exception additionally cancels every pending
//! or confirmed booking in its scope, in the same transaction as the
//! exception insert, and then fans out best-effort client notifications.
//! Notification failures are logged and never affect the cancellation
//! outcome.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use bookwise_core::conflict::Interval;
use bookwise_core::errors::EngineError;
use bookwise_core::models::booking::Booking;
use bookwise_core::models::schedule::{ApplyExceptionResponse, CreateExceptionRequest};
use bookwise_core::time::TimeOfDay;
use bookwise_db::models::{DbBooking, StoredTimeRange};
use bookwise_db::repositories::exception::NewException;
use uuid::Uuid;

use crate::notify::CancellationNotifier;
use crate::{ApiState, middleware::error_handling::AppError};

/// Parses and validates the request's time ranges. Malformed times are
/// rejected here, at write time, never during slot computation.
fn parse_time_ranges(
    payload: &CreateExceptionRequest,
) -> Result<Option<Vec<StoredTimeRange>>, AppError> {
    // Ranges are meaningless on a closed day; the closed flag wins
    if payload.is_closed {
        return Ok(None);
    }
    let Some(ranges) = &payload.time_ranges else {
        return Ok(None);
    };

    let mut stored = Vec::with_capacity(ranges.len());
    for range in ranges {
        let start = TimeOfDay::parse(&range.start)?;
        let end = TimeOfDay::parse(&range.end)?;
        let interval = Interval::new(start, end)?;
        stored.push(StoredTimeRange {
            start_minute: i32::from(interval.start.minutes()),
            end_minute: i32::from(interval.end.minutes()),
        });
    }
    Ok(Some(stored))
}

/// Best-effort notification fan-out for cancelled bookings. Each booking is
/// attempted independently; failures are logged and swallowed. Returns the
/// number of notifications delivered.
pub async fn notify_cancelled(
    notifier: &dyn CancellationNotifier,
    cancelled: &[Booking],
) -> usize {
    let mut delivered = 0;
    for booking in cancelled {
        match notifier.booking_cancelled(booking).await {
            Ok(()) => delivered += 1,
            Err(err) => {
                tracing::warn!(
                    "Failed to notify client of cancelled booking {}: {}",
                    booking.id,
                    err
                );
            }
        }
    }
    delivered
}

/// Creates a schedule exception. For a closed day this is the cascade
/// trigger: the affected bookings are cancelled atomically with the
/// exception insert, so a failure leaves neither behind.
///
/// # Endpoint
///
/// ```text
/// POST /api/exceptions
/// ```
#[axum::debug_handler]
pub async fn apply_schedule_exception(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateExceptionRequest>,
) -> Result<Json<ApplyExceptionResponse>, AppError> {
    // STEP 1: Write-time validation
    let time_ranges = parse_time_ranges(&payload)?;

    bookwise_db::repositories::service::get_professional_by_id(
        &state.db_pool,
        payload.professional_id,
    )
    .await
    .map_err(EngineError::Database)?
    .ok_or_else(|| {
        EngineError::NotFound(format!(
            "Professional with ID {} not found",
            payload.professional_id
        ))
    })?;

    if let Some(staff_id) = payload.staff_id {
        let staff =
            bookwise_db::repositories::staff::get_staff_member_by_id(&state.db_pool, staff_id)
                .await
                .map_err(EngineError::Database)?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("Staff member with ID {staff_id} not found"))
                })?;
        if staff.professional_id != payload.professional_id {
            return Err(AppError(EngineError::Validation(
                "staff member does not belong to this professional".to_string(),
            )));
        }
    }

    // STEP 2: Must-succeed transactional write; the cascade happens inside
    let new = NewException {
        professional_id: payload.professional_id,
        staff_id: payload.staff_id,
        date: payload.date,
        is_closed: payload.is_closed,
        time_ranges,
    };
    let (exception, cancelled) =
        bookwise_db::repositories::exception::apply_exception(&state.db_pool, &new)
            .await
            .map_err(EngineError::Database)?;

    // STEP 3: Best-effort notification fan-out, isolated per booking
    let bookings_cancelled = cancelled.len();
    let notifiable: Vec<Booking> = cancelled
        .into_iter()
        .filter_map(|row: DbBooking| match row.into_domain() {
            Ok(booking) => Some(booking),
            Err(err) => {
                tracing::warn!("Skipping notification for malformed booking row: {}", err);
                None
            }
        })
        .collect();
    notify_cancelled(state.notifier.as_ref(), &notifiable).await;

    Ok(Json(ApplyExceptionResponse {
        exception_id: exception.id,
        bookings_cancelled,
    }))
}

#[axum::debug_handler]
pub async fn delete_schedule_exception(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = bookwise_db::repositories::exception::delete_exception(&state.db_pool, id)
        .await
        .map_err(EngineError::Database)?;
    if !deleted {
        return Err(AppError(EngineError::NotFound(format!(
            "Schedule exception with ID {id} not found"
        ))));
    }
    Ok(StatusCode::NO_CONTENT)
}
