use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::{cors_layer, resolve_identity};
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes -- exempt from identity resolution by path prefix
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login));

    let sweet_routes = Router::new()
        .route(
            "/api/sweets",
            get(handlers::list_sweets).post(handlers::create_sweet),
        )
        .route("/api/sweets/search", get(handlers::search_sweets))
        .route(
            "/api/sweets/:id",
            get(handlers::get_sweet)
                .put(handlers::update_sweet)
                .delete(handlers::delete_sweet),
        )
        .route("/api/sweets/:id/purchase", post(handlers::purchase_sweet))
        .route("/api/sweets/:id/restock", post(handlers::restock_sweet));

    Router::new()
        .merge(auth_routes)
        .merge(sweet_routes)
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            resolve_identity,
        ))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
