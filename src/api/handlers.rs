//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    CreateSessionResponse, ErrorResponse, MessageRequest, MessageResponse, ResultsQuery,
    ResultsResponse, SearchRequest, SearchResponse, SelectRequest, SelectResponse,
    SessionSnapshot, SuccessResponse,
};
use super::AppState;
use crate::runtime::SseEvent;
use crate::session::{SessionEvent, TransitionError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        // SSE streaming
        .route("/api/sessions/:id/stream", get(stream_session))
        // User actions
        .route("/api/sessions/:id/search", post(search))
        .route("/api/sessions/:id/results", get(get_results))
        .route("/api/sessions/:id/select", post(select))
        .route("/api/sessions/:id/message", post(send_message))
        .route("/api/sessions/:id/clear", post(clear_chat))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let session_id = state.create_session().await;
    Json(CreateSessionResponse { session_id })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let runtime = lookup(&state, &id).await?;
    let runtime = runtime.lock().await;
    Ok(Json(SessionSnapshot::of(runtime.session())))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.remove_session(&id).await {
        Ok(Json(SuccessResponse::ok()))
    } else {
        Err(AppError::NotFound(format!("no session {id}")))
    }
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let runtime = lookup(&state, &id).await?;
    let runtime = runtime.lock().await;
    let rx = runtime.subscribe();
    let snapshot = SessionSnapshot::of(runtime.session());
    Ok(sse_stream(snapshot, rx))
}

// ============================================================
// User Actions
// ============================================================

async fn search(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = request.query.trim().to_string();
    if query.is_empty() {
        return Err(AppError::BadRequest("query must not be empty".to_string()));
    }

    let runtime = lookup(&state, &id).await?;
    let mut runtime = runtime.lock().await;
    runtime
        .dispatch(SessionEvent::SearchSubmitted { query })
        .await?;

    Ok(Json(SearchResponse {
        count: runtime.session().results().len(),
    }))
}

async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let runtime = lookup(&state, &id).await?;
    let runtime = runtime.lock().await;
    let results = query
        .filter
        .apply(runtime.session().results())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(ResultsResponse { results }))
}

async fn select(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let runtime = lookup(&state, &id).await?;
    let mut runtime = runtime.lock().await;
    runtime
        .dispatch(SessionEvent::ProductSelected {
            registration_id: request.registration_id.clone(),
        })
        .await?;

    let leaflet_loaded = runtime
        .session()
        .leaflet()
        .is_some_and(|l| l.registration_id == request.registration_id);
    Ok(Json(SelectResponse { leaflet_loaded }))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    let runtime = lookup(&state, &id).await?;
    let mut runtime = runtime.lock().await;
    let mut rx = runtime.subscribe();
    runtime
        .dispatch(SessionEvent::ChatSubmitted { text: request.text })
        .await?;

    // A failed turn commits nothing; it surfaces as a TurnFailed event and
    // must be visibly distinguished from a valid reply.
    while let Ok(event) = rx.try_recv() {
        if let SseEvent::TurnFailed { message } = event {
            return Err(AppError::Upstream(message));
        }
    }

    let message = runtime
        .session()
        .transcript()
        .last()
        .cloned()
        .ok_or_else(|| AppError::Internal("transcript empty after turn".to_string()))?;
    Ok(Json(MessageResponse { message }))
}

async fn clear_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let runtime = lookup(&state, &id).await?;
    let mut runtime = runtime.lock().await;
    runtime.dispatch(SessionEvent::ChatCleared).await?;
    Ok(Json(SuccessResponse::ok()))
}

// ============================================================
// Helpers
// ============================================================

async fn lookup(
    state: &AppState,
    id: &str,
) -> Result<std::sync::Arc<tokio::sync::Mutex<crate::runtime::SessionRuntime>>, AppError> {
    state
        .get_session(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("no session {id}")))
}

enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Upstream(String),
    Internal(String),
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::UnknownProduct(_) => AppError::NotFound(e.to_string()),
            TransitionError::NotGrounded => AppError::Conflict(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
