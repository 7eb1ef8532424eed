use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::gate::Gate;
use crate::handlers;

/// Full router with the access gate in front of every route
pub fn app(gate: Arc<Gate>) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Gated portal pages
        .merge(portal_routes())
        .fallback(handlers::fallback)
        // Global middleware: tracing wraps the gate so redirects are traced too
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(gate, crate::middleware::gate_middleware)),
        )
}

fn portal_routes() -> Router {
    Router::new()
        .route("/admin", get(handlers::page))
        .route("/admin/*rest", get(handlers::page))
        .route("/client", get(handlers::page))
        .route("/client/*rest", get(handlers::page))
}
