use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Active,
    Stopped,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: SessionStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Set by `stop`; the final report ends here.
    pub stopped_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn begin(&mut self, session_id: String, started_at: DateTime<Utc>) {
        *self = Self {
            status: SessionStatus::Active,
            session_id: Some(session_id),
            started_at: Some(started_at),
            stopped_at: None,
        };
    }

    pub fn stop(&mut self, stopped_at: DateTime<Utc>) {
        self.status = SessionStatus::Stopped;
        self.stopped_at = Some(stopped_at);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
