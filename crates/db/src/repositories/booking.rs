use crate::models::DbBooking;
use bookwise_core::errors::{EngineError, EngineResult};
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, professional_id, staff_id, service_id, client_id, date, \
     start_minute, end_minute, status, auto_completed_at, completed_by, \
     auto_cancelled_by_exception, cancelled_at, cancellation_reason, created_at";

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub professional_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start_minute: i32,
    pub end_minute: i32,
}

/// Inserts a pending booking. The availability check the client saw is
/// advisory only; the bookings exclusion constraint is what actually rejects
/// a concurrent overlapping insert, surfaced here as `EngineError::Conflict`.
pub async fn create_booking(pool: &Pool<Postgres>, new: &NewBooking) -> EngineResult<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating booking: staff_id={}, date={}, {}..{}",
        new.staff_id,
        new.date,
        new.start_minute,
        new.end_minute
    );

    let query = format!(
        r#"
        INSERT INTO bookings (id, professional_id, staff_id, service_id, client_id, date,
                              start_minute, end_minute, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
        RETURNING {BOOKING_COLUMNS}
        "#
    );

    let result = sqlx::query_as::<_, DbBooking>(&query)
        .bind(id)
        .bind(new.professional_id)
        .bind(new.staff_id)
        .bind(new.service_id)
        .bind(new.client_id)
        .bind(new.date)
        .bind(new.start_minute)
        .bind(new.end_minute)
        .bind(now)
        .fetch_one(pool)
        .await;

    match result {
        Ok(booking) => Ok(booking),
        // 23P01 = exclusion_violation, 23505 = unique_violation
        Err(sqlx::Error::Database(db_err))
            if matches!(db_err.code().as_deref(), Some("23P01") | Some("23505")) =>
        {
            Err(EngineError::Conflict(
                "the requested time overlaps an existing booking".to_string(),
            ))
        }
        Err(err) => Err(EngineError::Database(err.into())),
    }
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let query = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    );

    let booking = sqlx::query_as::<_, DbBooking>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(booking)
}

/// Slot-occupying bookings (pending, confirmed, completed) for a set of
/// staff members with dates in [from, to]. Cancelled rows never block a
/// slot and are filtered out here rather than in the engine.
pub async fn occupying_bookings_in_range(
    pool: &Pool<Postgres>,
    staff_ids: &[Uuid],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbBooking>> {
    let query = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE staff_id = ANY($1)
          AND date BETWEEN $2 AND $3
          AND status IN ('pending', 'confirmed', 'completed')
        ORDER BY date ASC, start_minute ASC
        "#
    );

    let bookings = sqlx::query_as::<_, DbBooking>(&query)
        .bind(staff_ids)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

/// Provider accepts a pending booking. Zero rows affected means the booking
/// is missing or no longer pending.
pub async fn confirm_booking(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = 'confirmed'
        WHERE id = $1 AND status = 'pending'
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn cancel_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = 'canceled', cancelled_at = $2, cancellation_reason = $3
        WHERE id = $1 AND status IN ('pending', 'confirmed')
        "#,
    )
    .bind(id)
    .bind(now)
    .bind(reason)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Manual completion by the provider; `auto_completed_at` stays NULL, it is
/// reserved for the completion job.
pub async fn complete_booking(pool: &Pool<Postgres>, id: Uuid, completed_by: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = 'completed', completed_by = $2
        WHERE id = $1 AND status = 'confirmed'
        "#,
    )
    .bind(id)
    .bind(completed_by)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Candidates for the completion job: confirmed, never auto-completed, dated
/// inside the bounded historical window, oldest first, batch-limited.
pub async fn auto_completion_candidates(
    pool: &Pool<Postgres>,
    window_start: NaiveDate,
    today: NaiveDate,
    batch_size: i64,
) -> Result<Vec<DbBooking>> {
    let query = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE status = 'confirmed'
          AND auto_completed_at IS NULL
          AND date BETWEEN $1 AND $2
        ORDER BY date ASC, end_minute ASC
        LIMIT $3
        "#
    );

    let bookings = sqlx::query_as::<_, DbBooking>(&query)
        .bind(window_start)
        .bind(today)
        .bind(batch_size)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

/// Conditional auto-complete: only lands while the row is still confirmed
/// and untouched by another run. Zero rows affected means a concurrent run
/// or a client action got there first, which callers treat as
/// already-handled rather than as an error. This is what makes overlapping
/// job invocations safe without any locking.
pub async fn complete_if_still_confirmed(
    pool: &Pool<Postgres>,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = 'completed', auto_completed_at = $2, completed_by = 'auto'
        WHERE id = $1
          AND status = 'confirmed'
          AND auto_completed_at IS NULL
        "#,
    )
    .bind(id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
