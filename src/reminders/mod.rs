use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod repo;
pub mod scheduler;

pub use repo::Notification;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
