use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::AppError,
    plans,
    preferences::{self, ReminderTone},
    state::AppState,
    week::{self, PLAN_WEEK_START},
};

use super::repo::{self, Notification};
use super::scheduler::build_notifications;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/reminders", get(list_reminders))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/reminders", post(schedule_reminders))
        .route("/reminders/past", delete(clear_past))
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

/// Schedule reminders for this week's plan.
///
/// Missing preferences are not an error here: reminders may be requested
/// before a profile is saved, in which case default meal times and tone
/// apply. A plan must exist, though.
#[instrument(skip(state))]
pub async fn schedule_reminders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<(StatusCode, Json<Vec<Notification>>), AppError> {
    let week_start = week::start_of_week(OffsetDateTime::now_utc().date(), PLAN_WEEK_START);
    let plan = plans::repo::current_for_week(&state.db, user_id, week_start)
        .await?
        .ok_or(AppError::NotFound("plan"))?;

    let prefs = preferences::repo::get(&state.db, user_id).await?;
    let (meal_times, tone) = match &prefs {
        Some(p) => (p.meal_times.0.clone(), p.reminder_tone),
        None => (Default::default(), ReminderTone::default()),
    };

    let batch = build_notifications(plan.week_start_date, &plan.days, &meal_times, tone);
    let created = repo::insert_batch(&state.db, user_id, plan.id, &batch).await?;

    info!(user_id = %user_id, plan_id = %plan.id, count = created.len(), "reminders scheduled");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_reminders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Notification>>, AppError> {
    let upcoming = repo::list_upcoming(&state.db, user_id, OffsetDateTime::now_utc()).await?;
    Ok(Json(upcoming))
}

#[instrument(skip(state))]
pub async fn clear_past(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ClearResponse>, AppError> {
    let deleted = repo::clear_past(&state.db, user_id, OffsetDateTime::now_utc()).await?;
    info!(user_id = %user_id, deleted, "past reminders cleared");
    Ok(Json(ClearResponse { deleted }))
}
