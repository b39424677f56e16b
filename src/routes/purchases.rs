use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use crate::handlers::purchase;
use crate::middleware::auth::{require_admin, require_auth, require_user};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/purchases", get(purchase::list_purchases))
        .route("/purchases/{id}", get(purchase::get_purchase))
        .route_layer(middleware::from_fn(require_admin));

    // Static segments win over `{id}`, so my-purchases never reaches get_purchase.
    let customer = Router::new()
        .route("/purchases/my-purchases", get(purchase::my_purchases))
        .route("/purchases/new", post(purchase::new_purchase))
        .route_layer(middleware::from_fn(require_user));

    admin
        .merge(customer)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
