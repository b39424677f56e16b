use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;

use crate::dtos::user::{LoginRequest, LoginResponse, RegisterUserRequest, UserResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::services::accounts;
use crate::state::AppState;

// POST /users/register
#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let account = accounts::register(state.accounts.as_ref(), &state.auth, payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

// GET /users/login (credentials in the body)
#[instrument(skip(state, payload))]
pub async fn login_user(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    // An unreadable body is the same as one without credentials.
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let response = accounts::login(state.accounts.as_ref(), &state.auth, payload).await?;
    Ok(Json(response))
}

// GET /users/me
#[instrument(skip(state, auth), fields(account_id = %auth.account_id))]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let account = state
        .accounts
        .find_by_id(auth.account_id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;
    Ok(Json(UserResponse::from(account)))
}

// GET /users
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let accounts = state.accounts.find_all().await?;
    Ok(Json(accounts.into_iter().map(UserResponse::from).collect()))
}
