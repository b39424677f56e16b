pub mod products;
pub mod purchases;
pub mod users;

use axum::{routing::get, Router};
use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(users::routes(&state))
        .merge(products::routes(&state))
        .merge(purchases::routes(&state))
        .route("/", get(|| async { "Storefront API" }))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state)
}
