//! JSON HTTP surface
//!
//! Exposes the chat pipeline to any number of concurrent sessions. Each
//! session is addressed by the id returned from `POST /api/sessions` and is
//! served one question at a time.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::assistant::Assistant;
use crate::directory::{CompanySummary, StudentRecord};
use crate::error::{HoosWhoError, Result};
use crate::providers::ChatMessage;
use crate::session::SessionStore;

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 32 * 1024;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    assistant: Arc<Assistant>,
    sessions: Arc<SessionStore>,
    featured_count: usize,
}

impl AppState {
    /// Create handler state
    ///
    /// Sessions untouched for `session_idle` are expired.
    pub fn new(
        assistant: Arc<Assistant>,
        featured_count: usize,
        session_idle: chrono::Duration,
    ) -> Self {
        let sessions = SessionStore::new(
            assistant.rate_limit(),
            assistant.rate_window(),
            session_idle,
        );
        Self {
            assistant,
            sessions: Arc::new(sessions),
            featured_count,
        }
    }
}

/// Error response wrapper
#[derive(Debug)]
pub struct ApiError(HoosWhoError);

impl From<HoosWhoError> for ApiError {
    fn from(err: HoosWhoError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            HoosWhoError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            HoosWhoError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            HoosWhoError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            HoosWhoError::SessionBusy(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.user_message(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DirectoryResponse {
    pub students: usize,
    pub companies: Vec<CompanySummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub welcome_acknowledged: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub reply: String,
    pub transcript_len: usize,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/directory", get(directory))
        .route("/api/directory/featured", get(featured))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", delete(end_session))
        .route("/api/sessions/:id/welcome", post(acknowledge_welcome))
        .route(
            "/api/sessions/:id/messages",
            get(transcript).post(ask).delete(clear),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn directory(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Json<DirectoryResponse> {
    let directory = state.assistant.directory();
    Json(DirectoryResponse {
        students: directory.len(),
        companies: directory.companies(query.q.as_deref()),
    })
}

async fn featured(State(state): State<AppState>) -> Json<Vec<StudentRecord>> {
    Json(state.assistant.directory().featured(state.featured_count))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create();
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id,
            welcome_acknowledged: false,
        }),
    )
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn acknowledge_welcome(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    let mut session = state.sessions.try_lock(&id)?;
    session.acknowledge_welcome();
    Ok(StatusCode::NO_CONTENT)
}

async fn transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<Vec<ChatMessage>>, ApiError> {
    let session = state.sessions.try_lock(&id)?;
    Ok(Json(session.transcript().to_vec()))
}

async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AskRequest>,
) -> std::result::Result<Json<AskResponse>, ApiError> {
    let mut session = state.sessions.try_lock(&id)?;
    let reply = state.assistant.submit(&mut session, &body.message).await?;
    Ok(Json(AskResponse {
        reply,
        transcript_len: session.transcript().len(),
    }))
}

async fn clear(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    let mut session = state.sessions.try_lock(&id)?;
    state.assistant.clear(&mut session);
    Ok(StatusCode::NO_CONTENT)
}

/// Bind and serve until Ctrl-C
///
/// # Errors
///
/// Returns error if the address cannot be bound or the server fails
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
