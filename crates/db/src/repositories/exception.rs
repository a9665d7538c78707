use crate::models::{DbBooking, DbScheduleException, StoredTimeRange};
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewException {
    pub professional_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub is_closed: bool,
    pub time_ranges: Option<Vec<StoredTimeRange>>,
}

/// Persists the exception and, for a closed day, flips the affected
/// pending/confirmed bookings to cancelled_system in the same transaction.
/// Either both writes land or neither does; a partial cascade is never
/// visible. Returns the cancelled rows so the caller can fan out
/// notifications.
///
/// Re-applying a closed day is safe: the update only touches bookings that
/// are still pending or confirmed, so rows cancelled earlier stay untouched.
pub async fn apply_exception(
    pool: &Pool<Postgres>,
    new: &NewException,
) -> Result<(DbScheduleException, Vec<DbBooking>)> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Applying schedule exception: professional_id={}, staff_id={:?}, date={}, is_closed={}",
        new.professional_id,
        new.staff_id,
        new.date,
        new.is_closed
    );

    let mut tx = pool.begin().await?;

    let exception = sqlx::query_as::<_, DbScheduleException>(
        r#"
        INSERT INTO schedule_exceptions (id, professional_id, staff_id, date, is_closed, time_ranges, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, professional_id, staff_id, date, is_closed, time_ranges, created_at
        "#,
    )
    .bind(id)
    .bind(new.professional_id)
    .bind(new.staff_id)
    .bind(new.date)
    .bind(new.is_closed)
    .bind(new.time_ranges.clone().map(Json))
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let cancelled = if new.is_closed {
        sqlx::query_as::<_, DbBooking>(
            r#"
            UPDATE bookings
            SET status = 'cancelled_system',
                auto_cancelled_by_exception = TRUE,
                cancelled_at = $3,
                cancellation_reason = 'closed day'
            WHERE professional_id = $1
              AND date = $2
              AND status IN ('pending', 'confirmed')
              AND ($4::uuid IS NULL OR staff_id = $4)
            RETURNING id, professional_id, staff_id, service_id, client_id, date,
                      start_minute, end_minute, status, auto_completed_at, completed_by,
                      auto_cancelled_by_exception, cancelled_at, cancellation_reason, created_at
            "#,
        )
        .bind(new.professional_id)
        .bind(new.date)
        .bind(now)
        .bind(new.staff_id)
        .fetch_all(&mut *tx)
        .await?
    } else {
        Vec::new()
    };

    tx.commit().await?;

    if !cancelled.is_empty() {
        tracing::info!(
            "Closed-day exception {} cancelled {} booking(s) on {}",
            exception.id,
            cancelled.len(),
            new.date
        );
    }

    Ok((exception, cancelled))
}

/// Exceptions for a professional whose date falls in [from, to].
pub async fn exceptions_in_range(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbScheduleException>> {
    let exceptions = sqlx::query_as::<_, DbScheduleException>(
        r#"
        SELECT id, professional_id, staff_id, date, is_closed, time_ranges, created_at
        FROM schedule_exceptions
        WHERE professional_id = $1
          AND date BETWEEN $2 AND $3
        ORDER BY date ASC, created_at ASC
        "#,
    )
    .bind(professional_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(exceptions)
}

pub async fn delete_exception(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM schedule_exceptions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
