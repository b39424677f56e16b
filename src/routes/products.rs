use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use crate::handlers::product::{
    activate_product, add_product, get_product, get_products, unactivate_product, update_product,
};
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    // Open routes - anyone can browse the catalog
    let open = Router::new()
        .route("/products", get(get_products))
        .route("/products/{id}", get(get_product));

    let admin = Router::new()
        .route("/products/add", post(add_product))
        .route("/products/update/{id}", put(update_product))
        .route("/products/activate/{id}", put(activate_product))
        .route("/products/unactivate/{id}", put(unactivate_product))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    open.merge(admin)
}
