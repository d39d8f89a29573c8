//! REST API request handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::error::IngresError;
use crate::query::{QueryOutcome, QueryProcessor};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Query pipeline shared by every request.
    pub processor: Arc<QueryProcessor>,
}

impl ApiState {
    /// Create new API state.
    pub fn new(processor: Arc<QueryProcessor>) -> Self {
        Self { processor }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query request.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// Natural language query text.
    #[serde(default)]
    pub message: String,
}

/// Query response: the pipeline outcome plus the time it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    #[serde(flatten)]
    pub outcome: QueryOutcome,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
        .into_response()
}

/// Run a blocking pipeline call off the async executor.
async fn run_blocking<T, F>(state: &ApiState, f: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce(&QueryProcessor) -> Result<T, IngresError> + Send + 'static,
{
    let processor = state.processor.clone();
    match tokio::task::spawn_blocking(move || f(&processor)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("Query task failed: {}", e)),
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

/// POST /api/query (also /api/chat) - Answer a natural language query.
///
/// The message is processed and echoed exactly as received.
pub async fn query_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    if request.message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Empty message", "empty_message");
    }
    let message = request.message;

    match run_blocking(&state, move |processor| processor.process(&message)).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(QueryResponse {
                outcome,
                timestamp: chrono::Utc::now(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Query failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e, "query_failed")
        }
    }
}

/// GET /api/stats - Assessment coverage statistics.
pub async fn stats_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match run_blocking(&state, |processor| processor.stats()).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            tracing::error!("Stats failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e, "stats_failed")
        }
    }
}

/// GET /api/health - Liveness check.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "INGRES Query API".to_string(),
    })
}
