//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{auth_middleware, require_admin},
};

pub mod auth;
pub mod currencies;
pub mod health;
pub mod rates;
pub mod transactions;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Admin routes: authentication first, then the role check
    let admin_routes = users::routes()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(currencies::routes())
        .merge(rates::routes())
        .merge(transactions::routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
        .merge(admin_routes)
}
