use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Preferences, PreferencesUpdate};

const COLUMNS: &str = "user_id, diet_type, allergies, foods_to_avoid, preferred_cuisines, \
     meals_per_day, total_days, include_snacks, meal_times, reminder_tone, \
     reminder_enabled, updated_at";

pub async fn get(db: &PgPool, user_id: Uuid) -> Result<Option<Preferences>, sqlx::Error> {
    sqlx::query_as::<_, Preferences>(&format!(
        "SELECT {COLUMNS} FROM preferences WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    update: PreferencesUpdate,
) -> Result<Preferences, sqlx::Error> {
    sqlx::query_as::<_, Preferences>(&format!(
        r#"
        INSERT INTO preferences (
            user_id, diet_type, allergies, foods_to_avoid, preferred_cuisines,
            meals_per_day, total_days, include_snacks, meal_times,
            reminder_tone, reminder_enabled, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
        ON CONFLICT (user_id) DO UPDATE SET
            diet_type = EXCLUDED.diet_type,
            allergies = EXCLUDED.allergies,
            foods_to_avoid = EXCLUDED.foods_to_avoid,
            preferred_cuisines = EXCLUDED.preferred_cuisines,
            meals_per_day = EXCLUDED.meals_per_day,
            total_days = EXCLUDED.total_days,
            include_snacks = EXCLUDED.include_snacks,
            meal_times = EXCLUDED.meal_times,
            reminder_tone = EXCLUDED.reminder_tone,
            reminder_enabled = EXCLUDED.reminder_enabled,
            updated_at = now()
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(update.diet_type)
    .bind(&update.allergies)
    .bind(&update.foods_to_avoid)
    .bind(&update.preferred_cuisines)
    .bind(update.meals_per_day)
    .bind(update.total_days)
    .bind(update.include_snacks)
    .bind(Json(&update.meal_times))
    .bind(update.reminder_tone)
    .bind(update.reminder_enabled)
    .fetch_one(db)
    .await
}
