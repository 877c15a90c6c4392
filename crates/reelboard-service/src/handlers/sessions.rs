//! Viewing session handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use reelboard_core::{SessionId, VideoId};
use reelboard_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Start session request.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// The video to watch.
    pub video_id: String,
}

/// Start session response.
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    /// The session ID to report completion against.
    pub session_id: String,
    /// The video being watched.
    pub video_id: String,
    /// Current session state.
    pub state: String,
    /// `true` when an already-open session was resumed instead of a new
    /// one being created (e.g. a second browser tab).
    pub resumed: bool,
    /// Session start time (RFC 3339).
    pub started_at: String,
}

/// Start (or resume) a viewing session for the authenticated user.
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let video_id = body
        .video_id
        .parse::<VideoId>()
        .map_err(|_| ApiError::BadRequest("Invalid video ID".into()))?;

    let start = state.engine.start_session(&auth.user_id, &video_id)?;

    Ok(Json(StartSessionResponse {
        session_id: start.session.id.to_string(),
        video_id: start.session.video_id.to_string(),
        state: "started".into(),
        resumed: start.resumed,
        started_at: start.session.started_at.to_rfc3339(),
    }))
}

/// Complete session request.
#[derive(Debug, Deserialize)]
pub struct CompleteSessionRequest {
    /// Client-reported watch time in seconds.
    pub watched_seconds: u32,
}

/// Complete session response.
#[derive(Debug, Serialize)]
pub struct CompleteSessionResponse {
    /// `true` only for the call that actually granted the view credit.
    /// Duplicate completions get `false` with a 200, not an error.
    pub credit_awarded: bool,
    /// Balance after the call.
    pub new_balance: i64,
}

/// Complete a viewing session, awarding the view credit at most once.
pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<CompleteSessionRequest>,
) -> Result<Json<CompleteSessionResponse>, ApiError> {
    let session_id = id
        .parse::<SessionId>()
        .map_err(|_| ApiError::BadRequest("Invalid session ID".into()))?;

    // Users may only complete their own sessions.
    let session = state
        .store
        .get_session(&session_id)?
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {session_id}")))?;
    if session.user_id != auth.user_id {
        return Err(ApiError::NotFound(format!(
            "session not found: {session_id}"
        )));
    }

    let completion = state
        .engine
        .complete_session(&session_id, body.watched_seconds)?;

    Ok(Json(CompleteSessionResponse {
        credit_awarded: completion.credit_awarded,
        new_balance: completion.new_balance,
    }))
}
