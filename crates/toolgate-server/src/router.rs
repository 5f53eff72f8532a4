use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::{auth, handlers};

/// Create the main application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // JSON-RPC endpoint, behind the client key check
    let mcp = Router::new()
        .route("/mcp", post(handlers::mcp_request))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(mcp)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
