//! Video catalog handlers.
//!
//! The upload pipeline calls these after transcoding finishes; the
//! engine only needs the duration and playability flag to run the award
//! path.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use reelboard_core::{VideoId, VideoMeta};

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Video registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterVideoRequest {
    /// The video ID assigned by the upload pipeline.
    pub video_id: String,
    /// Display title.
    pub title: String,
    /// Duration in seconds.
    pub duration_seconds: u32,
    /// Whether the video is ready to play (default true).
    #[serde(default = "default_playable")]
    pub playable: bool,
}

fn default_playable() -> bool {
    true
}

/// Video registration response.
#[derive(Debug, Serialize)]
pub struct RegisterVideoResponse {
    /// The registered video ID.
    pub video_id: String,
    /// Whether the video is playable.
    pub playable: bool,
}

/// Register (or update) a video catalog record.
pub async fn register_video(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
    Json(body): Json<RegisterVideoRequest>,
) -> Result<Json<RegisterVideoResponse>, ApiError> {
    let video_id = body
        .video_id
        .parse::<VideoId>()
        .map_err(|_| ApiError::BadRequest("Invalid video ID".into()))?;

    if body.duration_seconds == 0 {
        return Err(ApiError::BadRequest(
            "Video duration must be positive".into(),
        ));
    }

    let mut video = VideoMeta::new(video_id, body.title, body.duration_seconds);
    video.playable = body.playable;

    tracing::debug!(
        service = %auth.service_name,
        video_id = %video_id,
        "Registering video"
    );

    state.engine.register_video(&video)?;

    Ok(Json(RegisterVideoResponse {
        video_id: video_id.to_string(),
        playable: video.playable,
    }))
}
