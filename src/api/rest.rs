//! REST API router.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{health_handler, query_handler, stats_handler, ApiState};
use crate::config::ServerConfig;

/// Create the REST API router.
///
/// Endpoints, relative to the configured prefix:
/// - POST /query  - Answer a natural language query
/// - POST /chat   - Alias of /query for chat clients
/// - GET  /stats  - Coverage statistics
/// - GET  /health - Liveness check
///
/// The prefix itself serves the endpoint listing.
pub fn create_rest_router(state: ApiState, config: &ServerConfig) -> Router {
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/query", post(query_handler))
        .route("/chat", post(query_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let info_route = Router::new().route(&config.prefix, get(api_info_handler));

    let router = Router::new()
        .nest(&config.prefix, api_routes)
        .merge(info_route);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}

/// API info handler.
async fn api_info_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "INGRES Query API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Natural language queries over groundwater assessment data",
        "endpoints": {
            "query": {
                "method": "POST",
                "path": "/query",
                "description": "Answer a natural language query",
                "body": {
                    "message": "Query text (required)"
                }
            },
            "chat": {
                "method": "POST",
                "path": "/chat",
                "description": "Alias of /query"
            },
            "stats": {
                "method": "GET",
                "path": "/stats",
                "description": "Assessment coverage statistics"
            },
            "health": {
                "method": "GET",
                "path": "/health",
                "description": "Liveness check"
            }
        }
    }))
}
