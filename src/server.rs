//! HTTP service exposing the resolution pipeline (requires the `server` feature)
//!
//! Routes:
//! - `POST /v1` - resolve a URL, FlareSolverr-compatible request/response
//! - `GET /health` - resolve a known URL and report the browser user-agent
//! - `GET /` - redirect to `/health`
//!
//! Each request launches its own browser session; the synchronous pipeline
//! runs on the blocking thread pool.

use crate::api::{HealthcheckResponse, LinkRequest, LinkResponse};
use crate::browser::{DriverSession, InterstitialSolver, LaunchOptions};
use crate::pipeline::ChallengePipeline;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};

/// Shared state: launch options every per-request session is created from
#[derive(Clone)]
pub struct AppState {
    pub launch: LaunchOptions,
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/v1", post(resolve))
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::permanent("/health")
}

async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthcheckResponse>, (StatusCode, String)> {
    let launch = state.launch.clone();

    let result = tokio::task::spawn_blocking(move || {
        let session = DriverSession::launch(launch)?;
        let mut pipeline = ChallengePipeline::new(session, InterstitialSolver);
        pipeline.health_check()
    })
    .await
    .map_err(join_error)?;

    match result {
        Ok(user_agent) => Ok(Json(HealthcheckResponse { user_agent })),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Health check failed".to_string()))
        }
    }
}

async fn resolve(
    State(state): State<AppState>,
    Json(request): Json<LinkRequest>,
) -> Result<Json<LinkResponse>, (StatusCode, String)> {
    let launch = state.launch.clone();

    let result = tokio::task::spawn_blocking(move || {
        let session = DriverSession::launch(launch)?;
        let mut pipeline = ChallengePipeline::new(session, InterstitialSolver);
        pipeline.resolve(&request.url, request.max_timeout)
    })
    .await
    .map_err(join_error)?;

    match result {
        Ok(response) => Ok(Json(response)),
        Err(e) if e.is_timeout() => {
            log::error!("Resolution timed out: {}", e);
            Err((StatusCode::REQUEST_TIMEOUT, "Timed out while solving the challenge".to_string()))
        }
        Err(e) => {
            log::error!("Resolution failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Worker task failed: {}", e))
}
