use axum::Router;

use crate::state::AppState;

pub mod cache;
pub mod handlers;
pub mod model;
pub mod repo;

pub use model::{DietType, Preferences, ReminderTone};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::preference_routes())
        .merge(handlers::profile_routes())
}
