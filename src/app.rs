use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, CorsConfig, StorageBackend};
use crate::error::{AppError, Result};
use crate::services::accounts;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore};
use crate::{database, routes};

/// Opens the configured store, seeds the administrator and returns the full router.
pub async fn build(config: &AppConfig) -> Result<Router> {
    let state = match &config.storage {
        StorageBackend::Postgres(db) => {
            let pool = database::create_pool(db).await?;
            database::ensure_schema(&pool, &config.collections).await?;
            AppState::new(Arc::new(PgStore::new(pool, config.collections.clone())), config.auth.clone())
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            AppState::new(Arc::new(MemoryStore::new()), config.auth.clone())
        }
    };

    if let Some(seed) = &config.admin {
        accounts::ensure_admin(state.accounts.as_ref(), &state.auth, seed).await?;
    }

    router(state, &config.cors)
}

/// Router over an already-built state, with CORS and request tracing.
pub fn router(state: AppState, cors: &CorsConfig) -> Result<Router> {
    Ok(routes::create_router(state)
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

    if config.allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::Config(format!("Invalid CORS origin: {origin}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(origins))
}
