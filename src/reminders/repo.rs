use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::scheduler::PendingNotification;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_time: OffsetDateTime,
    pub is_sent: bool,
}

const COLUMNS: &str = "id, user_id, plan_id, message, scheduled_time, is_sent";

/// Insert a scheduler batch in one statement, returning the created rows.
pub async fn insert_batch(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
    batch: &[PendingNotification],
) -> Result<Vec<Notification>, sqlx::Error> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let messages: Vec<String> = batch.iter().map(|n| n.message.clone()).collect();
    let times: Vec<OffsetDateTime> = batch.iter().map(|n| n.scheduled_time).collect();

    sqlx::query_as::<_, Notification>(&format!(
        r#"
        INSERT INTO notifications (user_id, plan_id, message, scheduled_time)
        SELECT $1, $2, unnest($3::text[]), unnest($4::timestamptz[])
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(plan_id)
    .bind(&messages)
    .bind(&times)
    .fetch_all(db)
    .await
}

pub async fn list_upcoming(
    db: &PgPool,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM notifications
        WHERE user_id = $1 AND scheduled_time >= $2
        ORDER BY scheduled_time
        "#
    ))
    .bind(user_id)
    .bind(now)
    .fetch_all(db)
    .await
}

/// Delete every notification already in the past for this user.
pub async fn clear_past(
    db: &PgPool,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM notifications
        WHERE user_id = $1 AND scheduled_time < $2
        "#,
    )
    .bind(user_id)
    .bind(now)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}
