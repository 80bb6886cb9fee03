use axum::Router;

use crate::state::AppState;

pub mod aggregate;
pub mod handlers;
pub mod repo;

pub use aggregate::DisplayItem;
pub use repo::GroceryItem;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
