use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Account, Role};

// Fields are optional so missing ones surface as a 400 from validation.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub r_password: Option<String>,
    pub name: Option<String>,
    pub lastname: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub lastname: String,
    pub role: Role,
    pub purchases: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for UserResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            lastname: account.lastname,
            role: account.role,
            purchases: account.purchases,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in_seconds: i64,
}
