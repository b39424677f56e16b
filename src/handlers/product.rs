// src/handlers/product.rs
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::{info, instrument};

use crate::dtos::product::ProductResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{self, parse_id};

const MSG_NOT_FOUND: &str = "Product not found";
const MSG_DUPLICATE: &str = "A product with that description already exists";
const MSG_ALREADY_INACTIVE: &str = "Product is already deactivated";
const MSG_ALREADY_ACTIVE: &str = "Product is already active";
const MSG_NOT_EDITABLE: &str = "Product is not active and cannot be edited";

fn body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| AppError::unprocessable(e.body_text()))
}

// GET /products - available products only
#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.inventory.find_available().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// GET /products/{id} - inactive products are hidden
#[instrument(skip(state))]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(&id, MSG_NOT_FOUND)?;
    let product = state
        .inventory
        .find_by_id(id)
        .await?
        .filter(|p| p.available)
        .ok_or_else(|| AppError::not_found(MSG_NOT_FOUND))?;
    Ok(Json(ProductResponse::from(product)))
}

// POST /products/add
#[instrument(skip(state, payload))]
pub async fn add_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let new_product = validation::new_product(&body(payload)?)?;

    if state.inventory.find_by_description(&new_product.description).await?.is_some() {
        return Err(AppError::conflict(MSG_DUPLICATE));
    }

    let product = state.inventory.insert(new_product).await?;
    info!(product_id = %product.id, "Product added");
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/update/{id}
#[instrument(skip(state, payload))]
pub async fn update_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(&id, MSG_NOT_FOUND)?;
    let changes = validation::product_changes(&body(payload)?)?;

    if let Some(description) = &changes.description {
        if let Some(existing) = state.inventory.find_by_description(description).await? {
            if existing.id != id {
                return Err(AppError::conflict(MSG_DUPLICATE));
            }
        }
    }

    match state.inventory.update_attributes(id, changes).await? {
        Some(product) => Ok(Json(ProductResponse::from(product))),
        None => Err(missing_or(&state, id, MSG_NOT_EDITABLE).await),
    }
}

// PUT /products/activate/{id}
#[instrument(skip(state))]
pub async fn activate_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    set_availability(&state, &id, true, MSG_ALREADY_ACTIVE).await
}

// PUT /products/unactivate/{id}
#[instrument(skip(state))]
pub async fn unactivate_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    set_availability(&state, &id, false, MSG_ALREADY_INACTIVE).await
}

async fn set_availability(
    state: &AppState,
    raw_id: &str,
    available: bool,
    no_op: &str,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(raw_id, MSG_NOT_FOUND)?;
    match state.inventory.set_availability(id, available).await? {
        Some(product) => {
            info!(product_id = %product.id, available, "Product availability changed");
            Ok(Json(ProductResponse::from(product)))
        }
        None => Err(missing_or(state, id, no_op).await),
    }
}

/// Tells a missing product (404) apart from a refused change (409).
async fn missing_or(state: &AppState, id: uuid::Uuid, conflict: &str) -> AppError {
    match state.inventory.find_by_id(id).await {
        Ok(Some(_)) => AppError::conflict(conflict),
        Ok(None) => AppError::not_found(MSG_NOT_FOUND),
        Err(e) => e,
    }
}
