// src/database.rs
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::{CollectionNames, DatabaseConfig};
use crate::error::Result;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database connection established"
    );

    Ok(pool)
}

/// Creates the three collection tables when they are missing.
pub async fn ensure_schema(pool: &PgPool, tables: &CollectionNames) -> Result<()> {
    let statements = [
        format!(
            "CREATE TABLE IF NOT EXISTS {products} (
                id UUID PRIMARY KEY,
                description TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                stock INTEGER NOT NULL CHECK (stock >= 0),
                price NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
                available BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            products = tables.products
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {users} (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                name TEXT NOT NULL,
                lastname TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('admin', 'user')),
                purchases UUID[] NOT NULL DEFAULT '{{}}',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            users = tables.users
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {purchases} (
                id UUID PRIMARY KEY,
                items JSONB NOT NULL,
                date TIMESTAMPTZ NOT NULL
            )",
            purchases = tables.purchases
        ),
    ];

    for statement in &statements {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(
        users = %tables.users,
        products = %tables.products,
        purchases = %tables.purchases,
        "Schema ready"
    );

    Ok(())
}

pub async fn check_health(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
