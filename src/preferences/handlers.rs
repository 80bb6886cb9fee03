use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{auth::AuthUser, error::AppError, state::AppState};

use super::model::{Preferences, PreferencesUpdate};
use super::repo;

pub fn preference_routes() -> Router<AppState> {
    Router::new().route("/preferences", get(get_preferences).put(put_preferences))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile/status", get(profile_status))
}

#[derive(Debug, Serialize)]
pub struct ProfileStatus {
    pub complete: bool,
}

#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Preferences>, AppError> {
    repo::get(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("preferences"))
}

#[instrument(skip(state, payload))]
pub async fn put_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>, AppError> {
    payload.validate()?;

    let saved = repo::upsert(&state.db, user_id, payload).await?;

    // Saving preferences is the invalidation trigger for the status cache.
    state.profile_cache.set(user_id, true).await;

    info!(user_id = %user_id, "preferences saved");
    Ok(Json(saved))
}

#[instrument(skip(state))]
pub async fn profile_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileStatus>, AppError> {
    if let Some(complete) = state.profile_cache.get(user_id).await {
        return Ok(Json(ProfileStatus { complete }));
    }

    let complete = repo::get(&state.db, user_id).await?.is_some();
    state.profile_cache.set(user_id, complete).await;
    Ok(Json(ProfileStatus { complete }))
}
