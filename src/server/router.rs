//! Router assembly: health checks, order routes and the HTTP middleware stack

use crate::orders::OrderAppState;
use crate::orders::handlers::{create_order, get_order, list_orders, update_order_status};
use crate::server::cors::reject_unlisted_origins;
use crate::server::host::ServerHost;
use axum::{
    Json, Router, middleware,
    routing::{get, put},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the complete application router
///
/// Layers, outermost first: request tracing, origin rejection, CORS headers.
pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
    let mut app = health_routes().merge(build_order_routes(host.order_state()));

    for custom_router in custom_routes {
        app = app.merge(custom_router);
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(
                host.origins.clone(),
                reject_unlisted_origins,
            ))
            .layer(host.origins.cors_layer(&host.auth_header)),
    )
}

/// Build order routes
///
/// - POST /api/order - Create an order for the caller
/// - GET /api/order - List the caller's orders
/// - GET /api/order/{id} - Get one of the caller's orders
/// - PUT /api/order/{id}/status - Change an order's status
pub fn build_order_routes(state: OrderAppState) -> Router {
    Router::new()
        .route("/api/order", get(list_orders).post(create_order))
        .route("/api/order/{id}", get(get_order))
        .route("/api/order/{id}/status", put(update_order_status))
        .with_state(state)
}

/// Build health check routes
fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "storefront"
    }))
}
