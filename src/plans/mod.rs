use axum::Router;

use crate::state::AppState;

pub mod backend;
pub mod dto;
pub mod generator;
pub mod handlers;
pub mod repo;
pub mod service;

pub use dto::{MealType, Plan, PlanDay, PlanMeal};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
