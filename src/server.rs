use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::error::AnalyzeError;
use crate::pipeline::{AnalysisOutcome, Pipeline};

pub struct AppState {
    pub pipeline: Pipeline,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub pr_url: String,
}

/// Build the HTTP router for the service.
pub fn router(pipeline: Pipeline) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze/pr", post(analyze_pr))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(AppState { pipeline }))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn analyze_pr(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisOutcome>, AnalyzeError> {
    info!("analysis request received");
    let outcome = state.pipeline.analyze(&request.pr_url).await?;
    Ok(Json(outcome))
}

/// The single place failure kinds become HTTP responses. Exhaustive on
/// purpose: adding an error kind forces a mapping decision here.
impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AnalyzeError::InvalidReference(_) => {
                (StatusCode::BAD_REQUEST, "Invalid Pull Request")
            }
            AnalyzeError::DataSource(_) => {
                (StatusCode::BAD_GATEWAY, "Upstream Data Source Error")
            }
            AnalyzeError::Classifier(_)
            | AnalyzeError::Review(_)
            | AnalyzeError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Application Error")
            }
        };
        warn!(status = %status, error = %self, "request failed");

        let body = Json(serde_json::json!({
            "message": message,
            "detail": self.detail(),
        }));
        (status, body).into_response()
    }
}
