use crate::models::DbStaffMember;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Staff members bookable for a service: assigned to it, active, owned by
/// the professional, in creation order. `limit` carries the plan's staff
/// visibility cap; `None` binds as LIMIT ALL.
pub async fn eligible_staff_for_service(
    pool: &Pool<Postgres>,
    service_id: Uuid,
    professional_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<DbStaffMember>> {
    tracing::debug!(
        "Listing eligible staff: service_id={}, professional_id={}, limit={:?}",
        service_id,
        professional_id,
        limit
    );

    let staff = sqlx::query_as::<_, DbStaffMember>(
        r#"
        SELECT s.id, s.professional_id, s.name, s.active, s.created_at
        FROM staff_members s
        JOIN staff_services ss ON ss.staff_id = s.id
        WHERE ss.service_id = $1
          AND s.professional_id = $2
          AND s.active
        ORDER BY s.created_at ASC
        LIMIT $3
        "#,
    )
    .bind(service_id)
    .bind(professional_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(staff)
}

pub async fn get_staff_member_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbStaffMember>> {
    let staff_member = sqlx::query_as::<_, DbStaffMember>(
        r#"
        SELECT id, professional_id, name, active, created_at
        FROM staff_members
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(staff_member)
}

pub async fn is_staff_assigned_to_service(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
    service_id: Uuid,
) -> Result<bool> {
    let assigned = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM staff_services
            WHERE staff_id = $1 AND service_id = $2
        );
        "#,
    )
    .bind(staff_id)
    .bind(service_id)
    .fetch_one(pool)
    .await?;

    Ok(assigned)
}
