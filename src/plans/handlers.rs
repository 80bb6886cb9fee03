use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::AppError,
    state::AppState,
    week::{self, PLAN_WEEK_START},
};

use super::dto::{Pagination, Plan};
use super::{repo, service};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/plans/current", get(current_plan))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/plans/generate", post(generate_plan))
}

#[instrument(skip(state))]
pub async fn generate_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<(StatusCode, Json<Plan>), AppError> {
    let plan = service::generate_plan(&state, user_id).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state))]
pub async fn current_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Plan>, AppError> {
    let week_start = week::start_of_week(OffsetDateTime::now_utc().date(), PLAN_WEEK_START);
    repo::current_for_week(&state.db, user_id, week_start)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("plan"))
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Plan>>, AppError> {
    let (limit, offset) = p.clamped();
    let plans = repo::list_recent(&state.db, user_id, limit, offset).await?;
    Ok(Json(plans))
}
