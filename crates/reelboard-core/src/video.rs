//! Video catalog metadata.
//!
//! Only the fields the award engine needs: existence, playability, and
//! total duration (for the fractional completion threshold). Transcoding
//! and storage live elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::VideoId;

/// Catalog record for one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMeta {
    /// The video ID (assigned at upload).
    pub id: VideoId,

    /// Display title.
    pub title: String,

    /// Total duration in seconds.
    pub duration_seconds: u32,

    /// Whether the video is currently playable. Unplayable videos
    /// cannot start viewing sessions.
    pub playable: bool,

    /// When the video was registered.
    pub created_at: DateTime<Utc>,
}

impl VideoMeta {
    /// Create a playable video record.
    #[must_use]
    pub fn new(id: VideoId, title: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            id,
            title: title.into(),
            duration_seconds,
            playable: true,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_video_is_playable() {
        let video = VideoMeta::new(VideoId::generate(), "Demo", 40);
        assert!(video.playable);
        assert_eq!(video.duration_seconds, 40);
    }
}
