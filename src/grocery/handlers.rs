use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppError,
    state::AppState,
    week::{self, PLAN_WEEK_START},
};

use super::aggregate::{aggregate, DisplayItem};
use super::repo::{self, GroceryItem, GroceryScope};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/grocery", get(list_grocery))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/grocery/:id", patch(toggle_item))
        .route("/grocery/purchased", delete(clear_purchased))
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeParam {
    All,
    #[default]
    Week,
    CurrentPlan,
}

#[derive(Debug, Deserialize)]
pub struct GroceryQuery {
    #[serde(default)]
    pub scope: ScopeParam,
    pub week_start: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub purchased: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    pub week_start: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

fn resolve_week_start(param: Option<&str>) -> Result<time::Date, AppError> {
    match param {
        Some(raw) => week::parse_date(raw)
            .ok_or_else(|| AppError::BadRequest(format!("invalid week_start '{raw}'"))),
        None => Ok(week::start_of_week(
            OffsetDateTime::now_utc().date(),
            PLAN_WEEK_START,
        )),
    }
}

#[instrument(skip(state))]
pub async fn list_grocery(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<GroceryQuery>,
) -> Result<Json<Vec<DisplayItem>>, AppError> {
    let scope = match query.scope {
        ScopeParam::All => GroceryScope::All,
        ScopeParam::Week => GroceryScope::Week(resolve_week_start(query.week_start.as_deref())?),
        ScopeParam::CurrentPlan => GroceryScope::CurrentPlan,
    };

    let items = repo::list(&state.db, user_id, scope).await?;
    Ok(Json(aggregate(&items)))
}

#[instrument(skip(state))]
pub async fn toggle_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<GroceryItem>, AppError> {
    repo::set_purchased(&state.db, user_id, item_id, payload.purchased)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("grocery item"))
}

#[instrument(skip(state))]
pub async fn clear_purchased(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ClearQuery>,
) -> Result<Json<ClearResponse>, AppError> {
    let week_start = resolve_week_start(query.week_start.as_deref())?;
    let deleted = repo::clear_purchased(&state.db, user_id, week_start).await?;
    info!(user_id = %user_id, %week_start, deleted, "cleared purchased grocery items");
    Ok(Json(ClearResponse { deleted }))
}
