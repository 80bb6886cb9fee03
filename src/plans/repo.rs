use sqlx::types::Json;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::week;

use super::dto::{Plan, PlanDay};

const COLUMNS: &str = "id, user_id, week_start_date, days, created_at";

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    week_start: Date,
    days: &[PlanDay],
) -> Result<Plan, sqlx::Error> {
    sqlx::query_as::<_, Plan>(&format!(
        r#"
        INSERT INTO meal_plans (user_id, week_start_date, days)
        VALUES ($1, $2, $3)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(week_start)
    .bind(Json(days))
    .fetch_one(db)
    .await
}

/// Most recent plan created within the week beginning at `week_start`.
pub async fn current_for_week(
    db: &PgPool,
    user_id: Uuid,
    week_start: Date,
) -> Result<Option<Plan>, sqlx::Error> {
    sqlx::query_as::<_, Plan>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM meal_plans
        WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
        ORDER BY created_at DESC
        LIMIT 1
        "#
    ))
    .bind(user_id)
    .bind(week::at_midnight(week_start))
    .bind(week::at_midnight(week_start) + time::Duration::days(7))
    .fetch_optional(db)
    .await
}

pub async fn list_recent(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Plan>, sqlx::Error> {
    sqlx::query_as::<_, Plan>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM meal_plans
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}
