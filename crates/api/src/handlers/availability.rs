//! # Availability Handlers
//!
//! This module contains the handlers computing which time slots are bookable
//! for a service on a given date, and which days of a month still have free
//! capacity.
//!
//! ## Day Availability Algorithm
//!
//! The day view resolves, per eligible staff member, the working ranges for
//! the date and tiles them with slots of exactly the service duration:
//!
//! 1. Resolve the service, its owning professional and the plan limits
//! 2. Load the bookable staff members (assigned, active, creation order,
//!    capped by the plan's staff visibility)
//! 3. Load the date's weekly schedule rows, exceptions and occupying
//!    bookings in one pass
//! 4. Run the pure slot pipeline per staff member; a closed-day exception
//!    yields nothing, explicit exception ranges replace the weekly windows
//! 5. Drop staff members without a single slot
//!
//! The month view repeats the per-day check over the remaining days of the
//! month inside the plan's advance-booking horizon, loading the whole
//! month's data up front and stopping at the first free slot per day.
//!
//! Both views are pure reads; nothing here blocks a concurrent booking
//! insert, which is why slot writes are guarded by the database exclusion
//! constraint rather than by this check.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;

use bookwise_core::availability::{self, StaffDayContext};
use bookwise_core::errors::{EngineError, EngineResult};
use bookwise_core::models::availability::{
    DayAvailabilityResponse, MonthAvailabilityResponse, StaffDaySlots,
};
use bookwise_core::models::booking::Booking;
use bookwise_core::models::schedule::{DayException, WeeklyWindow};
use bookwise_core::models::staff::{PlanLimits, Service};
use bookwise_core::time;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for the day availability endpoint
#[derive(Debug, Deserialize)]
pub struct DayAvailabilityQuery {
    pub service_id: Uuid,
    /// Civil date in Europe/Riga, "YYYY-MM-DD"
    pub date: NaiveDate,
}

/// Query parameters for the month availability endpoint
#[derive(Debug, Deserialize)]
pub struct MonthAvailabilityQuery {
    pub service_id: Uuid,
    /// Month as "YYYY-MM"
    pub month: String,
}

/// Parses a "YYYY-MM" month string into the first day of that month.
pub fn parse_month(month: &str) -> EngineResult<NaiveDate> {
    let invalid = || EngineError::Validation(format!("invalid month: {month:?}"));

    let (year, month_number) = month.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month_number.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month_number: u32 = month_number.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month_number, 1).ok_or_else(invalid)
}

/// Last day of the month containing `first`.
fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    // Both branches are valid calendar dates
    next_month.expect("first of month is always valid") - Duration::days(1)
}

/// Service, professional plan limits and eligible staff, loaded together
/// because both availability views start the same way.
struct AvailabilityScope {
    service: Service,
    limits: PlanLimits,
    staff_ids: Vec<Uuid>,
}

async fn resolve_scope(state: &ApiState, service_id: Uuid) -> Result<AvailabilityScope, AppError> {
    let service = bookwise_db::repositories::service::get_service_by_id(&state.db_pool, service_id)
        .await
        .map_err(EngineError::Database)?
        .ok_or_else(|| EngineError::NotFound(format!("Service with ID {service_id} not found")))?
        .into_domain()?;

    if !service.active {
        return Err(AppError(EngineError::NotFound(format!(
            "Service with ID {service_id} not found"
        ))));
    }

    let professional = bookwise_db::repositories::service::get_professional_by_id(
        &state.db_pool,
        service.professional_id,
    )
    .await
    .map_err(EngineError::Database)?
    .ok_or_else(|| {
        EngineError::NotFound(format!(
            "Professional with ID {} not found",
            service.professional_id
        ))
    })?;

    let limits = professional.plan_limits();

    let staff = bookwise_db::repositories::staff::eligible_staff_for_service(
        &state.db_pool,
        service.id,
        service.professional_id,
        limits.staff_visibility().map(|n| n as i64),
    )
    .await
    .map_err(EngineError::Database)?;

    Ok(AvailabilityScope {
        service,
        limits,
        staff_ids: staff.into_iter().map(|member| member.id).collect(),
    })
}

/// Loads and converts the schedule/exception/booking rows for a date range.
async fn load_range_data(
    state: &ApiState,
    scope: &AvailabilityScope,
    day_of_week: Option<i32>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<(Vec<WeeklyWindow>, Vec<DayException>, Vec<Booking>), AppError> {
    let schedules = bookwise_db::repositories::schedule::active_weekly_schedules(
        &state.db_pool,
        &scope.staff_ids,
        day_of_week,
    )
    .await
    .map_err(EngineError::Database)?;

    let exceptions = bookwise_db::repositories::exception::exceptions_in_range(
        &state.db_pool,
        scope.service.professional_id,
        from,
        to,
    )
    .await
    .map_err(EngineError::Database)?;

    let bookings = bookwise_db::repositories::booking::occupying_bookings_in_range(
        &state.db_pool,
        &scope.staff_ids,
        from,
        to,
    )
    .await
    .map_err(EngineError::Database)?;

    let windows = schedules
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<EngineResult<Vec<_>>>()?;
    let exceptions = exceptions
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<EngineResult<Vec<_>>>()?;
    let bookings = bookings
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<EngineResult<Vec<_>>>()?;

    Ok((windows, exceptions, bookings))
}

/// Computes the bookable slots per staff member for one service and date.
///
/// # Endpoint
///
/// ```text
/// GET /api/availability/day?service_id=<uuid>&date=2026-03-02
/// ```
///
/// Staff members with no slots that day are omitted; a past date yields an
/// empty staff list rather than an error.
#[axum::debug_handler]
pub async fn day_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DayAvailabilityQuery>,
) -> Result<Json<DayAvailabilityResponse>, AppError> {
    // STEP 1: Resolve service, plan limits and eligible staff
    let scope = resolve_scope(&state, query.service_id).await?;

    let empty = |service_id| {
        Json(DayAvailabilityResponse {
            service_id,
            date: query.date,
            staff: Vec::new(),
        })
    };

    // Past dates have no bookable slots by definition
    let now = time::riga_now();
    let today = now.date_naive();
    if query.date < today || scope.staff_ids.is_empty() {
        return Ok(empty(scope.service.id));
    }

    // STEP 2: Load the date's schedule rows, exceptions and bookings
    let weekday = i32::from(time::weekday_index(query.date));
    let (windows, exceptions, bookings) =
        load_range_data(&state, &scope, Some(weekday), query.date, query.date).await?;

    // STEP 3: Run the slot pipeline per staff member
    let past_cutoff = (query.date == today).then(|| time::civil_minute(&now));
    let mut staff_slots = Vec::new();
    for &staff_id in &scope.staff_ids {
        let ctx = StaffDayContext {
            windows: windows
                .iter()
                .filter(|window| window.staff_id == staff_id)
                .cloned()
                .collect(),
            exception: availability::select_exception(staff_id, &exceptions).cloned(),
            bookings: bookings
                .iter()
                .filter(|booking| booking.staff_id == staff_id)
                .cloned()
                .collect(),
        };

        let slots = availability::staff_day_slots(
            scope.service.id,
            scope.service.duration_minutes,
            &ctx,
            past_cutoff,
        );

        // Staff members with zero slots are excluded from the result
        if !slots.is_empty() {
            staff_slots.push(StaffDaySlots { staff_id, slots });
        }
    }

    Ok(Json(DayAvailabilityResponse {
        service_id: scope.service.id,
        date: query.date,
        staff: staff_slots,
    }))
}

/// Computes which days of a month still have at least one free slot.
///
/// # Endpoint
///
/// ```text
/// GET /api/availability/month?service_id=<uuid>&month=2026-03
/// ```
///
/// Days already past and days beyond the plan's advance-booking horizon are
/// excluded up front; each remaining day is accepted on the first free slot
/// found for any staff member.
#[axum::debug_handler]
pub async fn month_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<MonthAvailabilityQuery>,
) -> Result<Json<MonthAvailabilityResponse>, AppError> {
    // STEP 1: Resolve the month window and the availability scope
    let first = parse_month(&query.month)?;
    let last = last_day_of_month(first);
    let scope = resolve_scope(&state, query.service_id).await?;

    let now = time::riga_now();
    let today = now.date_naive();

    let from = first.max(today);
    let to = match scope.limits.advance_horizon_days() {
        Some(days) => last.min(today + Duration::days(days)),
        None => last,
    };

    if from > to || scope.staff_ids.is_empty() {
        return Ok(Json(MonthAvailabilityResponse {
            service_id: scope.service.id,
            month: query.month,
            available_days: Vec::new(),
        }));
    }

    // STEP 2: Load the whole window's data in one pass
    let (windows, exceptions, bookings) = load_range_data(&state, &scope, None, from, to).await?;

    // STEP 3: Scan the days, stopping at the first free slot per day
    let mut available_days = Vec::new();
    let mut day = from;
    while day <= to {
        let weekday = time::weekday_index(day);
        let past_cutoff = (day == today).then(|| time::civil_minute(&now));
        let day_exceptions: Vec<DayException> = exceptions
            .iter()
            .filter(|exception| exception.date == day)
            .cloned()
            .collect();

        let has_free_slot = scope.staff_ids.iter().any(|&staff_id| {
            let ctx = StaffDayContext {
                windows: windows
                    .iter()
                    .filter(|window| {
                        window.staff_id == staff_id && window.day_of_week == weekday
                    })
                    .cloned()
                    .collect(),
                exception: availability::select_exception(staff_id, &day_exceptions).cloned(),
                bookings: bookings
                    .iter()
                    .filter(|booking| booking.staff_id == staff_id && booking.date == day)
                    .cloned()
                    .collect(),
            };
            availability::day_has_free_slot(
                scope.service.id,
                scope.service.duration_minutes,
                &ctx,
                past_cutoff,
            )
        });

        if has_free_slot {
            available_days.push(day);
        }
        day += Duration::days(1);
    }

    Ok(Json(MonthAvailabilityResponse {
        service_id: scope.service.id,
        month: query.month,
        available_days,
    }))
}
