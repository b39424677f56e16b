use axum::{Router, routing::{post, get}, middleware};
use crate::state::AppState;
use crate::handlers::user::{register_user, login_user, get_me, list_users};
use crate::middleware::auth::{require_admin, require_auth};

pub fn routes(state: &AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/users/register", post(register_user))
        .route("/users/login", get(login_user).post(login_user));

    let admin = Router::new()
        .route("/users", get(list_users))
        .route_layer(middleware::from_fn(require_admin));

    let protected = Router::new()
        .route("/users/me", get(get_me))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    open.merge(protected)
}
