use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::instrument;

use crate::dtos::purchase::PurchaseResponse;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::PurchaseView;
use crate::state::AppState;
use crate::validation::{self, parse_id};

const MSG_NOT_FOUND: &str = "Purchase not found";

// GET /purchases
#[instrument(skip(state))]
pub async fn list_purchases(State(state): State<AppState>) -> Result<Json<Vec<PurchaseView>>, AppError> {
    Ok(Json(state.purchase_query().all().await?))
}

// GET /purchases/{id}
#[instrument(skip(state))]
pub async fn get_purchase(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PurchaseView>, AppError> {
    let id = parse_id(&id, MSG_NOT_FOUND)?;
    let view = state
        .purchase_query()
        .by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(MSG_NOT_FOUND))?;
    Ok(Json(view))
}

// GET /purchases/my-purchases
#[instrument(skip(state, auth), fields(account_id = %auth.account_id))]
pub async fn my_purchases(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<PurchaseView>>, AppError> {
    Ok(Json(state.purchase_query().for_account(auth.account_id).await?))
}

// POST /purchases/new
#[instrument(skip(state, auth, payload), fields(account_id = %auth.account_id))]
pub async fn new_purchase(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PurchaseResponse>), AppError> {
    let Json(body) = payload.map_err(|e| AppError::unprocessable(e.body_text()))?;
    let items = validation::purchase_items(&body)?;

    let purchase = state.checkout().checkout(items, auth.account_id).await?;

    Ok((StatusCode::CREATED, Json(PurchaseResponse::from(purchase))))
}
