//! Viewing session types for Reelboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SessionId, UserId, VideoId};

/// One attempt by one user to watch one video for credit.
///
/// Sessions move `Started -> Completed` and nowhere else. A session that
/// never completes simply stays `Started`; it consumes no credit and is
/// never awarded. Sessions are retained indefinitely for audit and
/// anti-abuse analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewingSession {
    /// Unique session ID (ULID). Doubles as the award event key.
    pub id: SessionId,

    /// The watching user.
    pub user_id: UserId,

    /// The video being watched.
    pub video_id: VideoId,

    /// Current lifecycle state.
    pub state: SessionState,

    /// When the session was started.
    pub started_at: DateTime<Utc>,

    /// When the session was completed. None until completion.
    pub completed_at: Option<DateTime<Utc>>,
}

impl ViewingSession {
    /// Create a new `Started` session.
    #[must_use]
    pub fn new(user_id: UserId, video_id: VideoId) -> Self {
        Self {
            id: SessionId::generate(),
            user_id,
            video_id,
            state: SessionState::Started,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Check whether this session has completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Transition to `Completed`. Idempotent: returns `true` only on the
    /// first transition.
    pub fn complete(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.state = SessionState::Completed;
        self.completed_at = Some(Utc::now());
        true
    }
}

/// Lifecycle state of a viewing session.
///
/// There is no persisted `Abandoned` state; abandoned sessions simply
/// never transition out of `Started`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// The user began watching.
    Started,

    /// The watch threshold was crossed and the award path ran.
    Completed,
}
