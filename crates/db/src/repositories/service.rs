use crate::models::{DbProfessional, DbService};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    tracing::debug!("Getting service by id: {}", id);

    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, professional_id, name, duration_minutes, active, created_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn get_professional_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbProfessional>> {
    tracing::debug!("Getting professional by id: {}", id);

    let professional = sqlx::query_as::<_, DbProfessional>(
        r#"
        SELECT id, name, staff_limit, max_advance_days, created_at
        FROM professionals
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(professional)
}
