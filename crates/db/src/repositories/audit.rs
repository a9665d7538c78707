use chrono::Utc;
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Records an audit event for a booking. Callers on best-effort paths log
/// and swallow the error; a failed audit write never reverts the state
/// change it describes.
pub async fn record_event(
    pool: &Pool<Postgres>,
    booking_id: Uuid,
    action: &str,
    actor: &str,
    detail: Option<serde_json::Value>,
) -> Result<()> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO audit_events (id, booking_id, action, actor, detail, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(booking_id)
    .bind(action)
    .bind(actor)
    .bind(detail.map(Json))
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}
