//! Route handler functions.
//!
//! Request validation happens here, before the orchestrator or the record
//! store is touched; everything past that point has its own fallback
//! behaviour and never turns into a 5xx through the chat path.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use rota_core::types::{ChatMessage, TheatreCase};
use rota_epr::{CaseDraft, CaseUpdate};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request/response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CasesParams {
    /// Restrict to a named day: "today" or "tomorrow".
    pub day: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /chat
///
/// The one structured-error surface of the chat path: a missing or blank
/// message is rejected with 400 before the pipeline runs.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message is required".to_string()));
    }

    let reply = state
        .orchestrator
        .process_chat(&request.message, request.user_id.as_deref())
        .await;
    Ok(Json(reply))
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.orchestrator.system_status().await)
}

/// POST /speech
///
/// Returns MP3 bytes, or 503 when synthesis is unavailable so clients can
/// fall back to browser-side speech.
pub async fn speech(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text is required".to_string()));
    }

    match state.orchestrator.generate_speech(&request.text).await {
        Some(audio) => Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio)),
        None => Err(ApiError::ServiceUnavailable(
            "speech synthesis unavailable".to_string(),
        )),
    }
}

/// GET /cases
pub async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<CasesParams>,
) -> Result<Json<Vec<TheatreCase>>, ApiError> {
    let cases = match params.day.as_deref() {
        Some("today") => state.adapter.get_cases_for_today().await?,
        Some("tomorrow") => state.adapter.get_cases_for_tomorrow().await?,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "unknown day filter '{}'; expected today or tomorrow",
                other
            )))
        }
        None => state.adapter.get_cases(None).await?,
    };
    Ok(Json(cases))
}

/// POST /cases
pub async fn create_case(
    State(state): State<AppState>,
    Json(draft): Json<CaseDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let case = state.adapter.create_case(draft).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

/// GET /cases/{id}
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TheatreCase>, ApiError> {
    state
        .adapter
        .get_case(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("case {} not found", id)))
}

/// PUT /cases/{id}
pub async fn update_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CaseUpdate>,
) -> Result<Json<TheatreCase>, ApiError> {
    Ok(Json(state.adapter.update_case(&id, update).await?))
}

/// DELETE /cases/{id}
pub async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.adapter.delete_case(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
