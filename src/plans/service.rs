use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::grocery;
use crate::preferences;
use crate::state::AppState;
use crate::week::{self, PLAN_WEEK_START};

use super::dto::{Plan, PlanDay};
use super::generator::{build_prompt, decode_days, fallback_days};
use super::repo;

/// Run the whole generation pipeline for one user: preferences lookup,
/// backend call with fallback, plan persistence, grocery expansion.
///
/// The only hard failures are a missing profile and a failed plan save.
/// Backend trouble degrades to the synthetic plan; a failed grocery
/// expansion is logged and swallowed so the saved plan is not lost.
pub async fn generate_plan(state: &AppState, user_id: Uuid) -> Result<Plan, AppError> {
    let prefs = preferences::repo::get(&state.db, user_id)
        .await?
        .ok_or(AppError::ProfileIncomplete)?;
    state.profile_cache.set(user_id, true).await;

    let today = OffsetDateTime::now_utc().date();
    let week_start = week::start_of_week(today, PLAN_WEEK_START);

    let days = resolve_days(state, &prefs, week_start).await;

    let plan = repo::insert(&state.db, user_id, week_start, &days).await?;
    info!(user_id = %user_id, plan_id = %plan.id, %week_start, "plan saved");

    if let Err(e) = grocery::repo::insert_for_plan(&state.db, &plan).await {
        // Partial-failure policy: the plan survives without its list.
        warn!(error = %e, plan_id = %plan.id, "grocery expansion failed, keeping plan");
    }

    Ok(plan)
}

async fn resolve_days(
    state: &AppState,
    prefs: &preferences::Preferences,
    week_start: time::Date,
) -> Vec<PlanDay> {
    let prompt = build_prompt(prefs);

    let raw = match state.planner.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            let e = AppError::BackendUnavailable(e.to_string());
            warn!(error = %e, "falling back to synthetic plan");
            return fallback_days(prefs, week_start);
        }
    };

    match decode_days(&raw, week_start, prefs.total_days, prefs.meals_per_day) {
        Ok(days) => days,
        Err(e) => {
            warn!(error = %e, "falling back to synthetic plan");
            fallback_days(prefs, week_start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::generator::test_prefs;
    use crate::preferences::DietType;
    use time::macros::date;

    // The backend in `AppState::fake()` always errors, so resolve_days must
    // come back with the synthetic plan and never touch the database.
    #[tokio::test]
    async fn backend_failure_resolves_to_fallback() {
        let state = AppState::fake();
        let prefs = test_prefs(DietType::Vegan, 3, 7);
        let days = resolve_days(&state, &prefs, date!(2024 - 01 - 07)).await;

        assert_eq!(days.len(), 7);
        assert!(days
            .iter()
            .flat_map(|d| &d.meals)
            .all(|m| m.name.starts_with("Sample ")));
    }
}
