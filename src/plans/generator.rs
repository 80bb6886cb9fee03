//! Prompt construction, response decoding and the deterministic fallback.
//!
//! Everything in here is pure: the orchestration (backend call, persistence,
//! grocery expansion) lives in `service.rs`.

use serde::Deserialize;
use time::{Date, Duration};

use crate::error::AppError;
use crate::preferences::Preferences;

use super::dto::{MealType, PlanDay, PlanMeal};

fn list_or<'a>(items: &'a [String], empty: &'a str) -> String {
    let filtered: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if filtered.is_empty() {
        empty.to_string()
    } else {
        filtered.join(", ")
    }
}

/// Natural-language request for the text-generation backend. Empty sets are
/// rendered "none"/"any", never omitted.
pub fn build_prompt(prefs: &Preferences) -> String {
    format!(
        "Create a {days}-day meal plan with {meals} meals per day.\n\
         Diet type: {diet}.\n\
         Allergies to avoid: {allergies}.\n\
         Other foods to avoid: {avoid}.\n\
         Preferred cuisines: {cuisines}.\n\
         Include snacks: {snacks}.\n\
         Respond with JSON only, shaped exactly like:\n\
         {{\"days\":[{{\"day\":1,\"date\":\"YYYY-MM-DD\",\"meals\":[{{\"type\":\"Breakfast\",\
         \"name\":\"...\",\"recipe\":\"...\",\"ingredients\":[\"...\"]}}]}}]}}",
        days = prefs.total_days,
        meals = prefs.meals_per_day,
        diet = prefs.diet_type.as_str(),
        allergies = list_or(&prefs.allergies, "none"),
        avoid = list_or(&prefs.foods_to_avoid, "none"),
        cuisines = list_or(&prefs.preferred_cuisines, "any"),
        snacks = if prefs.include_snacks { "yes" } else { "no" },
    )
}

/// Strip an optional fenced code block, returning the inner text.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}

#[derive(Debug, Deserialize)]
struct WirePlan {
    days: Vec<WireDay>,
}

#[derive(Debug, Deserialize)]
struct WireDay {
    meals: Vec<WireMeal>,
}

#[derive(Debug, Deserialize)]
struct WireMeal {
    #[serde(rename = "type")]
    meal_type: String,
    name: String,
    #[serde(default)]
    recipe: String,
    #[serde(default)]
    ingredients: Vec<String>,
}

/// Decode a backend response into typed days, enforcing the plan shape.
///
/// Day numbers and dates are always recomputed from `week_start` so the
/// sequential-days invariant holds no matter what the backend returned.
/// Anything that fails the shape check is `MalformedResponse`, which the
/// caller recovers with the fallback plan.
pub fn decode_days(
    raw: &str,
    week_start: Date,
    total_days: i32,
    meals_per_day: i32,
) -> Result<Vec<PlanDay>, AppError> {
    let wire: WirePlan = serde_json::from_str(extract_json(raw))
        .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    if wire.days.len() != total_days as usize {
        return Err(AppError::MalformedResponse(format!(
            "expected {total_days} days, got {}",
            wire.days.len()
        )));
    }

    let mut days = Vec::with_capacity(wire.days.len());
    for (i, wire_day) in wire.days.into_iter().enumerate() {
        if wire_day.meals.len() != meals_per_day as usize {
            return Err(AppError::MalformedResponse(format!(
                "day {} has {} meals, expected {meals_per_day}",
                i + 1,
                wire_day.meals.len()
            )));
        }
        let mut meals = Vec::with_capacity(wire_day.meals.len());
        for wire_meal in wire_day.meals {
            let meal_type = MealType::parse(&wire_meal.meal_type).ok_or_else(|| {
                AppError::MalformedResponse(format!("unknown meal type '{}'", wire_meal.meal_type))
            })?;
            if wire_meal.name.trim().is_empty() {
                return Err(AppError::MalformedResponse("empty meal name".into()));
            }
            meals.push(PlanMeal {
                meal_type,
                name: wire_meal.name,
                recipe: wire_meal.recipe,
                ingredients: wire_meal.ingredients,
            });
        }
        days.push(PlanDay {
            day: i as i32 + 1,
            date: week_start + Duration::days(i as i64),
            meals,
        });
    }
    Ok(days)
}

const FALLBACK_INGREDIENTS: [&str; 2] = ["Seasonal vegetables", "Olive oil"];

/// Deterministic synthetic plan used whenever the backend fails or returns
/// something unusable. Meal slots cycle Breakfast/Lunch/Dinner/Snack.
pub fn fallback_days(prefs: &Preferences, week_start: Date) -> Vec<PlanDay> {
    (0..prefs.total_days)
        .map(|i| {
            let meals = (0..prefs.meals_per_day)
                .map(|j| {
                    let meal_type = MealType::CYCLE[j as usize % MealType::CYCLE.len()];
                    PlanMeal {
                        meal_type,
                        name: format!("Sample {meal_type}"),
                        recipe: format!(
                            "A simple {} {} made from pantry staples.",
                            prefs.diet_type.as_str(),
                            meal_type.slot_key()
                        ),
                        ingredients: FALLBACK_INGREDIENTS
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    }
                })
                .collect();
            PlanDay {
                day: i + 1,
                date: week_start + Duration::days(i as i64),
                meals,
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn test_prefs(
    diet: crate::preferences::DietType,
    meals_per_day: i32,
    total_days: i32,
) -> Preferences {
    use sqlx::types::Json;
    use time::OffsetDateTime;

    Preferences {
        user_id: uuid::Uuid::new_v4(),
        diet_type: diet,
        allergies: vec![],
        foods_to_avoid: vec![],
        preferred_cuisines: vec![],
        meals_per_day,
        total_days,
        include_snacks: false,
        meal_times: Json(Default::default()),
        reminder_tone: crate::preferences::ReminderTone::Motivational,
        reminder_enabled: true,
        updated_at: OffsetDateTime::now_utc(),
    }
}
