use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "diet_type", rename_all = "snake_case")]
pub enum DietType {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    Mediterranean,
    Custom,
}

impl DietType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietType::Vegetarian => "vegetarian",
            DietType::Vegan => "vegan",
            DietType::GlutenFree => "gluten_free",
            DietType::DairyFree => "dairy_free",
            DietType::Mediterranean => "mediterranean",
            DietType::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "reminder_tone", rename_all = "snake_case")]
pub enum ReminderTone {
    Motivational,
    Gentle,
    Funny,
}

impl Default for ReminderTone {
    fn default() -> Self {
        ReminderTone::Motivational
    }
}

/// Meal-slot name ("breakfast" | "lunch" | "dinner") to "HH:MM" wall time.
pub type MealTimes = HashMap<String, String>;

/// Per-user diet preferences. One row per user; read-only input to the
/// plan generator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preferences {
    pub user_id: Uuid,
    pub diet_type: DietType,
    pub allergies: Vec<String>,
    pub foods_to_avoid: Vec<String>,
    pub preferred_cuisines: Vec<String>,
    pub meals_per_day: i32,
    pub total_days: i32,
    pub include_snacks: bool,
    pub meal_times: Json<MealTimes>,
    pub reminder_tone: ReminderTone,
    pub reminder_enabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Body of `PUT /preferences`, bound one-to-one to the table columns.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesUpdate {
    pub diet_type: DietType,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub foods_to_avoid: Vec<String>,
    #[serde(default)]
    pub preferred_cuisines: Vec<String>,
    pub meals_per_day: i32,
    pub total_days: i32,
    #[serde(default)]
    pub include_snacks: bool,
    #[serde(default)]
    pub meal_times: MealTimes,
    #[serde(default)]
    pub reminder_tone: ReminderTone,
    #[serde(default = "default_true")]
    pub reminder_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl PreferencesUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=6).contains(&self.meals_per_day) {
            return Err(AppError::BadRequest(
                "meals_per_day must be between 1 and 6".into(),
            ));
        }
        if !(1..=14).contains(&self.total_days) {
            return Err(AppError::BadRequest(
                "total_days must be between 1 and 14".into(),
            ));
        }
        for (slot, value) in &self.meal_times {
            if crate::week::parse_hhmm(value).is_none() {
                return Err(AppError::BadRequest(format!(
                    "meal time for '{slot}' must be HH:MM, got '{value}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update() -> PreferencesUpdate {
        PreferencesUpdate {
            diet_type: DietType::Vegan,
            allergies: vec![],
            foods_to_avoid: vec![],
            preferred_cuisines: vec![],
            meals_per_day: 3,
            total_days: 7,
            include_snacks: false,
            meal_times: MealTimes::new(),
            reminder_tone: ReminderTone::default(),
            reminder_enabled: true,
        }
    }

    #[test]
    fn accepts_in_range_values() {
        assert!(update().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_counts() {
        let mut bad = update();
        bad.meals_per_day = 0;
        assert!(bad.validate().is_err());

        let mut bad = update();
        bad.meals_per_day = 7;
        assert!(bad.validate().is_err());

        let mut bad = update();
        bad.total_days = 15;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn rejects_unparseable_meal_times() {
        let mut bad = update();
        bad.meal_times
            .insert("breakfast".into(), "quarter past nine".into());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn diet_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DietType::GlutenFree).unwrap(),
            r#""gluten_free""#
        );
        let back: DietType = serde_json::from_str(r#""dairy_free""#).unwrap();
        assert_eq!(back, DietType::DairyFree);
    }
}
