//! Per request: `Unauthenticated -> Authenticated(claims) -> Authorized | Forbidden`.
//!
//! `require_auth` verifies the bearer token and stores an [`AuthContext`];
//! `require_admin` / `require_user` then check its role. Layer the role check
//! inside the authentication layer.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::models::Role;
use crate::state::AppState;

const MSG_MISSING_TOKEN: &str = "Missing Authorization header";
const MSG_BAD_SCHEME: &str = "Invalid Authorization format";
const MSG_FORBIDDEN: &str = "You do not have permission to perform this action";

#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(MSG_MISSING_TOKEN))?;

    // Expect "Bearer <token>"
    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized(MSG_BAD_SCHEME))?;

    let claims = verify_token(token, &state.auth.jwt_secret)?;

    req.extensions_mut().insert(AuthContext {
        account_id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(Role::Admin, req, next).await
}

pub async fn require_user(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(Role::User, req, next).await
}

async fn require_role(role: Role, req: Request, next: Next) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(|| AppError::unauthorized(MSG_MISSING_TOKEN))?;

    if ctx.role != role {
        tracing::debug!(account_id = %ctx.account_id, have = %ctx.role, need = %role, "Role check failed");
        return Err(AppError::forbidden(MSG_FORBIDDEN));
    }

    Ok(next.run(req).await)
}
