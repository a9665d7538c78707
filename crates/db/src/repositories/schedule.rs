use crate::models::DbWeeklySchedule;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_weekly_schedule(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
    day_of_week: i32,
    start_minute: i32,
    end_minute: i32,
    service_ids: &[Uuid],
) -> Result<DbWeeklySchedule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating weekly schedule: staff_id={}, day_of_week={}, {}..{}",
        staff_id,
        day_of_week,
        start_minute,
        end_minute
    );

    let schedule = sqlx::query_as::<_, DbWeeklySchedule>(
        r#"
        INSERT INTO weekly_schedules (id, staff_id, day_of_week, start_minute, end_minute, active, service_ids, created_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7)
        RETURNING id, staff_id, day_of_week, start_minute, end_minute, active, service_ids, created_at
        "#,
    )
    .bind(id)
    .bind(staff_id)
    .bind(day_of_week)
    .bind(start_minute)
    .bind(end_minute)
    .bind(service_ids)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(schedule)
}

/// Active weekly rows for a set of staff members, optionally narrowed to one
/// weekday. The month view loads all weekdays at once and projects per day.
pub async fn active_weekly_schedules(
    pool: &Pool<Postgres>,
    staff_ids: &[Uuid],
    day_of_week: Option<i32>,
) -> Result<Vec<DbWeeklySchedule>> {
    let schedules = sqlx::query_as::<_, DbWeeklySchedule>(
        r#"
        SELECT id, staff_id, day_of_week, start_minute, end_minute, active, service_ids, created_at
        FROM weekly_schedules
        WHERE staff_id = ANY($1)
          AND active
          AND ($2::int IS NULL OR day_of_week = $2)
        ORDER BY day_of_week ASC, start_minute ASC
        "#,
    )
    .bind(staff_ids)
    .bind(day_of_week)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

pub async fn deactivate_weekly_schedule(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE weekly_schedules
        SET active = FALSE
        WHERE id = $1 AND active
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
