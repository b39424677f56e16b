pub mod product;
pub mod purchase;
pub mod user;

use axum::extract::State;
use axum::http::StatusCode;

use crate::error::AppError;
use crate::state::AppState;

// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.inventory.ping().await?;
    Ok("OK")
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
