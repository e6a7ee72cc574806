pub mod api;

use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::handlers;
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Public health route plus the protected API behind the worker-secret check
pub fn create_app(app_state: Arc<AppState>) -> Router {
    let protected_routes = api::create_api_router().layer(middleware::from_fn_with_state(
        app_state.clone(),
        auth_middleware,
    ));

    let public_routes = Router::new().route("/", get(handlers::api::health_check));

    public_routes.merge(protected_routes).with_state(app_state)
}
