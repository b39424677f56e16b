// src/config.rs
use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageBackend,
    pub collections: CollectionNames,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub admin: Option<AdminSeed>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where records live. `STORE_BACKEND=memory` runs without a database and
/// loses everything on exit.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Postgres(DatabaseConfig),
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Table names for the three record collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub users: String,
    pub products: String,
    pub purchases: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            products: "products".to_string(),
            purchases: "purchases".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

// Keep the secret out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

/// Administrator created at startup when no account with this email exists.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed").field("email", &self.email).finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let collections = CollectionNames {
            users: collection_var("USERS_COLLECTION", "users")?,
            products: collection_var("PRODUCTS_COLLECTION", "products")?,
            purchases: collection_var("PURCHASES_COLLECTION", "purchases")?,
        };

        let admin = match (env::var("ADMIN_EMAIL").ok(), env::var("ADMIN_PASSWORD").ok()) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::Config(
                    "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
                ))
            }
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: parse_var("PORT", 3000)?,
            },
            storage: storage_backend(env::var("STORE_BACKEND").ok().as_deref())?,
            collections,
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .map_err(|_| AppError::Config("JWT_SECRET must be set".to_string()))?,
                bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ORIGINS")
                    .map(|v| split_origins(&v))
                    .unwrap_or_default(),
            },
            admin,
        })
    }
}

fn storage_backend(kind: Option<&str>) -> Result<StorageBackend> {
    match kind.map(str::trim).unwrap_or("postgres") {
        "memory" => Ok(StorageBackend::Memory),
        "postgres" => Ok(StorageBackend::Postgres(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Config("DATABASE_URL must be set".to_string()))?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
        })),
        other => Err(AppError::Config(format!(
            "STORE_BACKEND must be postgres or memory, got {other:?}"
        ))),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid {name} value"))),
        Err(_) => Ok(default),
    }
}

fn collection_var(name: &str, default: &str) -> Result<String> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    if !is_identifier(&value) {
        return Err(AppError::Config(format!(
            "{name} must be a plain identifier, got {value:?}"
        )));
    }
    Ok(value)
}

/// Collection names end up inside SQL text, so only `[A-Za-z_][A-Za-z0-9_]*` is allowed.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_reject_sql_text() {
        assert!(is_identifier("products"));
        assert!(is_identifier("_shop_users2"));
        assert!(!is_identifier("2users"));
        assert!(!is_identifier("users; DROP TABLE users"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn memory_backend_needs_no_database_url() {
        assert!(matches!(storage_backend(Some("memory")), Ok(StorageBackend::Memory)));
        assert!(matches!(storage_backend(Some(" memory ")), Ok(StorageBackend::Memory)));
        assert!(matches!(storage_backend(Some("mongo")), Err(AppError::Config(_))));
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
