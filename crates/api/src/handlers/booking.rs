//! # Booking Lifecycle Handlers
//!
//! Clients create pending bookings; the provider confirms, cancels or
//! completes them. The overlap check at insert time is enforced by the
//! database exclusion constraint, so a booking that raced past the
//! availability read is still rejected here with a conflict.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use std::sync::Arc;

use bookwise_core::errors::EngineError;
use bookwise_core::models::booking::{
    BookingResponse, CancelBookingRequest, CreateBookingRequest,
};
use bookwise_core::time::TimeOfDay;
use bookwise_db::models::DbBooking;
use bookwise_db::repositories::booking::NewBooking;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

async fn load_booking(state: &ApiState, id: Uuid) -> Result<DbBooking, AppError> {
    let booking = bookwise_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(EngineError::Database)?
        .ok_or_else(|| EngineError::NotFound(format!("Booking with ID {id} not found")))?;
    Ok(booking)
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    // Boundary strings are validated here, at write time
    let start = TimeOfDay::parse(&payload.start)?;

    let service =
        bookwise_db::repositories::service::get_service_by_id(&state.db_pool, payload.service_id)
            .await
            .map_err(EngineError::Database)?
            .ok_or_else(|| {
                EngineError::NotFound(format!("Service with ID {} not found", payload.service_id))
            })?
            .into_domain()?;
    if !service.active {
        return Err(AppError(EngineError::NotFound(format!(
            "Service with ID {} not found",
            payload.service_id
        ))));
    }

    let staff = bookwise_db::repositories::staff::get_staff_member_by_id(
        &state.db_pool,
        payload.staff_id,
    )
    .await
    .map_err(EngineError::Database)?
    .ok_or_else(|| {
        EngineError::NotFound(format!("Staff member with ID {} not found", payload.staff_id))
    })?;

    if !staff.active || staff.professional_id != service.professional_id {
        return Err(AppError(EngineError::Validation(
            "staff member cannot take this service".to_string(),
        )));
    }
    let assigned = bookwise_db::repositories::staff::is_staff_assigned_to_service(
        &state.db_pool,
        staff.id,
        service.id,
    )
    .await
    .map_err(EngineError::Database)?;
    if !assigned {
        return Err(AppError(EngineError::Validation(
            "staff member cannot take this service".to_string(),
        )));
    }

    // The slot length is always the service duration
    let end = start.add_minutes(service.duration_minutes).ok_or_else(|| {
        EngineError::Validation("booking would run past the end of the day".to_string())
    })?;

    let new = NewBooking {
        professional_id: service.professional_id,
        staff_id: staff.id,
        service_id: service.id,
        client_id: payload.client_id,
        date: payload.date,
        start_minute: i32::from(start.minutes()),
        end_minute: i32::from(end.minutes()),
    };

    let booking = bookwise_db::repositories::booking::create_booking(&state.db_pool, &new).await?;

    Ok(Json(booking.into_domain()?.into()))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = load_booking(&state, id).await?;
    Ok(Json(booking.into_domain()?.into()))
}

#[axum::debug_handler]
pub async fn confirm_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    load_booking(&state, id).await?;

    let updated = bookwise_db::repositories::booking::confirm_booking(&state.db_pool, id)
        .await
        .map_err(EngineError::Database)?;
    if !updated {
        return Err(AppError(EngineError::Conflict(format!(
            "Booking {id} is not pending"
        ))));
    }

    let booking = load_booking(&state, id).await?;
    Ok(Json(booking.into_domain()?.into()))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CancelBookingRequest>>,
) -> Result<Json<BookingResponse>, AppError> {
    load_booking(&state, id).await?;

    let reason = payload.and_then(|Json(body)| body.reason);
    let updated = bookwise_db::repositories::booking::cancel_booking(
        &state.db_pool,
        id,
        reason.as_deref(),
        Utc::now(),
    )
    .await
    .map_err(EngineError::Database)?;
    if !updated {
        return Err(AppError(EngineError::Conflict(format!(
            "Booking {id} can no longer be cancelled"
        ))));
    }

    let booking = load_booking(&state, id).await?;
    Ok(Json(booking.into_domain()?.into()))
}

#[axum::debug_handler]
pub async fn complete_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    load_booking(&state, id).await?;

    let updated =
        bookwise_db::repositories::booking::complete_booking(&state.db_pool, id, "provider")
            .await
            .map_err(EngineError::Database)?;
    if !updated {
        return Err(AppError(EngineError::Conflict(format!(
            "Booking {id} is not confirmed"
        ))));
    }

    let booking = load_booking(&state, id).await?;
    Ok(Json(booking.into_domain()?.into()))
}
