use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::plans::{Plan, PlanDay};
use crate::week::{self, serde_date, PLAN_WEEK_START};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroceryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    #[serde(with = "serde_date")]
    pub week_start_date: Date,
    pub item_name: String,
    pub quantity: String,
    pub is_purchased: bool,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Which rows a read covers. One parameter instead of three code paths.
#[derive(Debug, Clone, Copy)]
pub enum GroceryScope {
    /// Every item the user owns.
    All,
    /// Items tagged with the given week start date.
    Week(Date),
    /// Items linked to the most recent plan created this calendar week.
    CurrentPlan,
}

const COLUMNS: &str =
    "id, user_id, plan_id, week_start_date, item_name, quantity, is_purchased, notes, created_at";

/// Write-path expansion: one entry per (meal, ingredient) pair, duplicates
/// included by design. Dedup happens only at read time.
pub fn expand_item_names(days: &[PlanDay]) -> Vec<String> {
    days.iter()
        .flat_map(|day| &day.meals)
        .flat_map(|meal| &meal.ingredients)
        .cloned()
        .collect()
}

/// Bulk-insert grocery rows for a freshly generated plan. Quantity and
/// purchase state take their column defaults ("1 unit", false).
pub async fn insert_for_plan(db: &PgPool, plan: &Plan) -> Result<u64, sqlx::Error> {
    let names = expand_item_names(&plan.days);
    if names.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO grocery_items (user_id, plan_id, week_start_date, item_name)
        SELECT $1, $2, $3, unnest($4::text[])
        "#,
    )
    .bind(plan.user_id)
    .bind(plan.id)
    .bind(plan.week_start_date)
    .bind(&names)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    scope: GroceryScope,
) -> Result<Vec<GroceryItem>, sqlx::Error> {
    match scope {
        GroceryScope::All => {
            sqlx::query_as::<_, GroceryItem>(&format!(
                "SELECT {COLUMNS} FROM grocery_items WHERE user_id = $1 ORDER BY created_at"
            ))
            .bind(user_id)
            .fetch_all(db)
            .await
        }
        GroceryScope::Week(week_start) => {
            sqlx::query_as::<_, GroceryItem>(&format!(
                "SELECT {COLUMNS} FROM grocery_items \
                 WHERE user_id = $1 AND week_start_date = $2 ORDER BY created_at"
            ))
            .bind(user_id)
            .bind(week_start)
            .fetch_all(db)
            .await
        }
        GroceryScope::CurrentPlan => {
            let week_start =
                week::start_of_week(OffsetDateTime::now_utc().date(), PLAN_WEEK_START);
            let Some(plan) =
                crate::plans::repo::current_for_week(db, user_id, week_start).await?
            else {
                return Ok(Vec::new());
            };
            sqlx::query_as::<_, GroceryItem>(&format!(
                "SELECT {COLUMNS} FROM grocery_items \
                 WHERE user_id = $1 AND plan_id = $2 ORDER BY created_at"
            ))
            .bind(user_id)
            .bind(plan.id)
            .fetch_all(db)
            .await
        }
    }
}

pub async fn set_purchased(
    db: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
    purchased: bool,
) -> Result<Option<GroceryItem>, sqlx::Error> {
    sqlx::query_as::<_, GroceryItem>(&format!(
        r#"
        UPDATE grocery_items
        SET is_purchased = $3
        WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(item_id)
    .bind(user_id)
    .bind(purchased)
    .fetch_optional(db)
    .await
}

/// Delete purchased rows for one week. Week-scoped on purpose: clearing a
/// checked-off list should not wipe other weeks' history.
pub async fn clear_purchased(
    db: &PgPool,
    user_id: Uuid,
    week_start: Date,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM grocery_items
        WHERE user_id = $1 AND week_start_date = $2 AND is_purchased = TRUE
        "#,
    )
    .bind(user_id)
    .bind(week_start)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::{MealType, PlanMeal};
    use time::macros::date;

    fn day(day: i32, ingredients_per_meal: &[&[&str]]) -> PlanDay {
        PlanDay {
            day,
            date: date!(2024 - 01 - 07),
            meals: ingredients_per_meal
                .iter()
                .map(|ingredients| PlanMeal {
                    meal_type: MealType::Lunch,
                    name: "Lunch".into(),
                    recipe: String::new(),
                    ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn expands_one_row_per_meal_ingredient_pair() {
        let days = vec![
            day(1, &[&["rice", "beans"], &["rice"]]),
            day(2, &[&["eggs"]]),
        ];
        let names = expand_item_names(&days);
        assert_eq!(names, vec!["rice", "beans", "rice", "eggs"]);
    }

    #[test]
    fn empty_ingredient_lists_expand_to_nothing() {
        let days = vec![day(1, &[&[]])];
        assert!(expand_item_names(&days).is_empty());
    }
}
