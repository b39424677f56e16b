pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod money;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use state::AppState;
