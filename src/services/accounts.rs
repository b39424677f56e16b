use tracing::info;

use crate::auth::jwt::{sign_token, TOKEN_TTL_SECONDS};
use crate::auth::password::{hash_password, verify_password};
use crate::config::{AdminSeed, AuthConfig};
use crate::dtos::user::{LoginRequest, LoginResponse, RegisterUserRequest};
use crate::error::{AppError, Result};
use crate::models::{Account, NewAccount, Role};
use crate::store::AccountStore;
use crate::validation::{self, normalize_email};

const MSG_EMAIL_TAKEN: &str = "An account with that email already exists";
const MSG_LOGIN_INCOMPLETE: &str = "Email and password are required to log in";
const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Creates a standard-user account.
pub async fn register(
    accounts: &dyn AccountStore,
    auth: &AuthConfig,
    req: RegisterUserRequest,
) -> Result<Account> {
    let registration = validation::registration(req)?;

    if accounts.find_by_email(&registration.email).await?.is_some() {
        return Err(AppError::conflict(MSG_EMAIL_TAKEN));
    }

    let password_hash = hash_password(&registration.password, auth.bcrypt_cost)?;
    let account = accounts
        .insert(NewAccount {
            email: registration.email,
            password_hash,
            name: registration.name,
            lastname: registration.lastname,
            role: Role::User,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with another registration for the same email.
            AppError::Conflict(_) => AppError::conflict(MSG_EMAIL_TAKEN),
            other => other,
        })?;

    info!(account_id = %account.id, "Account registered");
    Ok(account)
}

/// Looks the account up by email and returns a signed bearer token.
pub async fn login(
    accounts: &dyn AccountStore,
    auth: &AuthConfig,
    req: LoginRequest,
) -> Result<LoginResponse> {
    let (email, password) = match (req.email, req.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (normalize_email(&email), password)
        }
        _ => return Err(AppError::bad_request(MSG_LOGIN_INCOMPLETE)),
    };

    let account = accounts
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::unauthorized(MSG_INVALID_CREDENTIALS))?;

    if !verify_password(&password, &account.password_hash)? {
        return Err(AppError::unauthorized(MSG_INVALID_CREDENTIALS));
    }

    let token = sign_token(account.id, &account.email, account.role, &auth.jwt_secret)?;

    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in_seconds: TOKEN_TTL_SECONDS,
    })
}

/// Creates the configured administrator unless the email is already registered.
pub async fn ensure_admin(accounts: &dyn AccountStore, auth: &AuthConfig, seed: &AdminSeed) -> Result<()> {
    let email = normalize_email(&seed.email);
    if !validation::is_email(&email) {
        return Err(AppError::Config("ADMIN_EMAIL is not a valid email".to_string()));
    }
    if accounts.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let account = accounts
        .insert(NewAccount {
            email,
            password_hash: hash_password(&seed.password, auth.bcrypt_cost)?,
            name: "Administrator".to_string(),
            lastname: String::new(),
            role: Role::Admin,
        })
        .await?;

    info!(account_id = %account.id, "Administrator account seeded");
    Ok(())
}
