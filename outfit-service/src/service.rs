use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::{Html, Json, Response},
    routing::{get, post},
};
use outfit_flow::{FlowError, FlowRunner, WeatherProvider};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::models::{CreateOutfitRequest, RatingRequest, SessionResponse};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

const INDEX_HTML: &str = include_str!("../static/index.html");

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn conflict_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn flow_error(e: FlowError, session_id: &str) -> ApiError {
    match e {
        FlowError::SessionNotFound(_) => not_found_error("Session not found", session_id),
        FlowError::InvalidRating(_) => bad_request_error(&e.to_string()),
        FlowError::Finalized => conflict_error("Session already completed", session_id),
        other => {
            error!(session_id = %session_id, error = %other, "Workflow failed");
            internal_error("Workflow execution failed", &other.to_string())
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub flow_runner: FlowRunner,
    pub weather: Arc<dyn WeatherProvider>,
    pub default_max_attempts: u32,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/locations", get(locations))
        .route("/outfit", post(start_outfit))
        .route("/outfit/{session_id}", get(get_session_status))
        .route("/outfit/{session_id}/rating", post(submit_rating))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(mut request: Request<axum::body::Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

async fn root() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn locations(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "locations": state.weather.known_locations() }))
}

async fn start_outfit(
    State(state): State<AppState>,
    Json(request): Json<CreateOutfitRequest>,
) -> ApiResult<SessionResponse> {
    if let Some(field) = request.missing_field() {
        return Err(bad_request_error(&format!("{field} is required")));
    }
    let max_attempts = request.max_attempts.unwrap_or(state.default_max_attempts);
    if max_attempts == 0 {
        return Err(bad_request_error("max_attempts must be at least 1"));
    }

    info!(
        location = %request.location,
        occasion = %request.occasion,
        max_attempts,
        "Starting outfit recommendation"
    );

    let (session_id, result) = state
        .flow_runner
        .start(request.into_request(), max_attempts)
        .await
        .map_err(|e| flow_error(e, "new"))?;
    info!(session_id = %session_id, status = ?result.status, "First recommendation ready");

    snapshot(&state, &session_id).await
}

async fn submit_rating(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<RatingRequest>,
) -> ApiResult<SessionResponse> {
    info!(session_id = %session_id, rating = request.rating, "Rating received");

    let result = state
        .flow_runner
        .submit_rating(&session_id, request.rating)
        .await
        .map_err(|e| {
            warn!(session_id = %session_id, error = %e, "Rating rejected");
            flow_error(e, &session_id)
        })?;
    info!(session_id = %session_id, status = ?result.status, "Rating processed");

    snapshot(&state, &session_id).await
}

async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionResponse> {
    snapshot(&state, &session_id).await
}

async fn snapshot(state: &AppState, session_id: &str) -> ApiResult<SessionResponse> {
    let session = state
        .flow_runner
        .session(session_id)
        .await
        .map_err(|e| flow_error(e, session_id))?;
    Ok(Json(session.into()))
}
