//! Derives timed notifications from a plan: a prep reminder and a meal
//! reminder per (day, meal), plus one weekly "regenerate" reminder.

use time::{Date, Duration, OffsetDateTime, Time};

use crate::plans::{PlanDay, PlanMeal};
use crate::preferences::model::MealTimes;
use crate::preferences::ReminderTone;
use crate::week::{self, at_time, parse_hhmm, REMINDER_WEEK_START};

/// Used when a meal slot has no configured time.
const DEFAULT_MEAL_AT: Time = time::macros::time!(12:00);

/// Wall time of the weekly regenerate reminder.
const REGENERATE_AT: Time = time::macros::time!(10:00);

/// How long before a meal its prep reminder fires.
const PREP_LEAD: Duration = Duration::hours(1);

#[derive(Debug, Clone, PartialEq)]
pub struct PendingNotification {
    pub message: String,
    pub scheduled_time: OffsetDateTime,
}

fn prep_message(tone: ReminderTone, meal: &PlanMeal) -> String {
    let name = &meal.name;
    let slot = meal.meal_type.slot_key();
    match tone {
        ReminderTone::Motivational => {
            format!("Get ready to prep {name}! A great {slot} starts now.")
        }
        ReminderTone::Gentle => {
            format!("A gentle heads-up: time to start prepping {name} for {slot}.")
        }
        ReminderTone::Funny => {
            format!("Chop chop! {name} won't cook itself, and {slot} is coming.")
        }
    }
}

fn meal_message(tone: ReminderTone, meal: &PlanMeal) -> String {
    let name = &meal.name;
    let slot = meal.meal_type.slot_key();
    match tone {
        ReminderTone::Motivational => {
            format!("It's {slot} time! Enjoy your {name} and keep the streak going.")
        }
        ReminderTone::Gentle => {
            format!("Whenever you're ready, {name} is waiting for {slot}.")
        }
        ReminderTone::Funny => {
            format!("Ding! It's {slot} o'clock. Go eat {name} before it gets ideas.")
        }
    }
}

fn meal_time_for(meal: &PlanMeal, meal_times: &MealTimes) -> Time {
    meal_times
        .get(meal.meal_type.slot_key())
        .and_then(|s| parse_hhmm(s))
        .unwrap_or(DEFAULT_MEAL_AT)
}

/// Build the full notification batch for a plan: `2 * meals + 1` entries.
///
/// Works with whatever `meal_times`/`tone` the caller resolved; missing
/// preferences degrade to the defaults above rather than failing.
pub fn build_notifications(
    week_start_date: Date,
    days: &[PlanDay],
    meal_times: &MealTimes,
    tone: ReminderTone,
) -> Vec<PendingNotification> {
    let mut out = Vec::new();

    for day in days {
        for meal in &day.meals {
            let meal_at = at_time(day.date, meal_time_for(meal, meal_times));
            out.push(PendingNotification {
                message: prep_message(tone, meal),
                scheduled_time: meal_at - PREP_LEAD,
            });
            out.push(PendingNotification {
                message: meal_message(tone, meal),
                scheduled_time: meal_at,
            });
        }
    }

    // Anchor on the day after the (Sunday-start) plan week begins: that day
    // is always inside the Monday-start week covering the plan's span, so
    // the reminder lands on the closing Sunday, after the week's meals.
    // Anchoring on week_start_date itself would collapse to that same
    // Sunday and fire on the first morning of the plan.
    let regenerate_on = week::week_end(week::start_of_week(
        week_start_date + Duration::days(1),
        REMINDER_WEEK_START,
    ));
    out.push(PendingNotification {
        message: "Time to plan next week! Generate a fresh meal plan.".into(),
        scheduled_time: at_time(regenerate_on, REGENERATE_AT),
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::generator::{fallback_days, test_prefs};
    use crate::preferences::DietType;
    use time::macros::{date, time};

    fn sample_days(meals_per_day: i32, total_days: i32) -> Vec<PlanDay> {
        let prefs = test_prefs(DietType::Vegan, meals_per_day, total_days);
        fallback_days(&prefs, date!(2024 - 01 - 07))
    }

    #[test]
    fn produces_two_per_meal_plus_regenerate() {
        let days = sample_days(3, 7);
        let batch =
            build_notifications(date!(2024 - 01 - 07), &days, &MealTimes::new(), ReminderTone::Motivational);
        assert_eq!(batch.len(), 2 * 7 * 3 + 1);
    }

    #[test]
    fn defaults_to_noon_with_one_hour_prep_lead() {
        let days = sample_days(1, 1);
        let batch = build_notifications(
            date!(2024 - 01 - 07),
            &days,
            &MealTimes::new(),
            ReminderTone::Gentle,
        );
        assert_eq!(batch[0].scheduled_time, at_time(date!(2024 - 01 - 07), time!(11:00)));
        assert_eq!(batch[1].scheduled_time, at_time(date!(2024 - 01 - 07), time!(12:00)));
    }

    #[test]
    fn honors_configured_meal_times() {
        let days = sample_days(1, 1);
        let mut meal_times = MealTimes::new();
        meal_times.insert("breakfast".into(), "08:30".into());
        let batch = build_notifications(
            date!(2024 - 01 - 07),
            &days,
            &meal_times,
            ReminderTone::Funny,
        );
        assert_eq!(batch[0].scheduled_time, at_time(date!(2024 - 01 - 07), time!(07:30)));
        assert_eq!(batch[1].scheduled_time, at_time(date!(2024 - 01 - 07), time!(08:30)));
    }

    #[test]
    fn unparseable_meal_time_falls_back_to_noon() {
        let days = sample_days(1, 1);
        let mut meal_times = MealTimes::new();
        meal_times.insert("breakfast".into(), "sunrise".into());
        let batch = build_notifications(
            date!(2024 - 01 - 07),
            &days,
            &meal_times,
            ReminderTone::Gentle,
        );
        assert_eq!(batch[1].scheduled_time, at_time(date!(2024 - 01 - 07), time!(12:00)));
    }

    #[test]
    fn regenerate_lands_at_end_of_monday_week_at_ten() {
        let days = sample_days(1, 1);
        let batch = build_notifications(
            date!(2024 - 01 - 07),
            &days,
            &MealTimes::new(),
            ReminderTone::Motivational,
        );
        // Plan week starts Sunday 2024-01-07; the Monday-start week covering
        // its span runs 2024-01-08 through Sunday 2024-01-14.
        let last = batch.last().unwrap();
        assert_eq!(last.scheduled_time, at_time(date!(2024 - 01 - 14), time!(10:00)));
        assert!(last.message.contains("next week"));
    }

    #[test]
    fn regenerate_fires_after_every_meal_reminder() {
        // Full 7-day plan beginning Sunday 2024-01-07: the regenerate
        // reminder must not land on the plan's first morning.
        let days = sample_days(3, 7);
        let batch = build_notifications(
            date!(2024 - 01 - 07),
            &days,
            &MealTimes::new(),
            ReminderTone::Motivational,
        );
        let (regenerate, meals) = batch.split_last().unwrap();
        let last_meal = meals.iter().map(|n| n.scheduled_time).max().unwrap();
        assert_eq!(last_meal, at_time(date!(2024 - 01 - 13), time!(12:00)));
        assert!(regenerate.scheduled_time > last_meal);
    }

    #[test]
    fn messages_interpolate_meal_and_vary_by_tone() {
        let days = sample_days(1, 1);
        for tone in [
            ReminderTone::Motivational,
            ReminderTone::Gentle,
            ReminderTone::Funny,
        ] {
            let batch =
                build_notifications(date!(2024 - 01 - 07), &days, &MealTimes::new(), tone);
            assert!(batch[0].message.contains("Sample Breakfast"));
            assert!(batch[1].message.contains("Sample Breakfast"));
            assert!(batch[0].message.contains("breakfast"));
        }

        let motivational = build_notifications(
            date!(2024 - 01 - 07),
            &days,
            &MealTimes::new(),
            ReminderTone::Motivational,
        );
        let funny = build_notifications(
            date!(2024 - 01 - 07),
            &days,
            &MealTimes::new(),
            ReminderTone::Funny,
        );
        assert_ne!(motivational[0].message, funny[0].message);
    }
}
