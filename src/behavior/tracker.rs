use chrono::Utc;

use super::types::{BehaviorReport, BehaviorSnapshot, BehaviorUpdate};

/// Running behavior state for a session.
///
/// Stays `None` until the first update lands; failed requests never touch it.
#[derive(Debug, Clone, Default)]
pub struct BehaviorTracker {
    current: Option<BehaviorSnapshot>,
    frames_sent: u64,
}

impl BehaviorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an update over the current snapshot (or the neutral defaults) and
    /// return the result.
    pub fn apply(&mut self, update: BehaviorUpdate) -> BehaviorSnapshot {
        let snapshot = self.current.get_or_insert_with(BehaviorSnapshot::default);
        snapshot.merge(update, Utc::now());
        snapshot.clone()
    }

    pub fn note_frame_sent(&mut self) {
        self.frames_sent += 1;
    }

    pub fn current(&self) -> Option<&BehaviorSnapshot> {
        self.current.as_ref()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn report(&self) -> BehaviorReport {
        BehaviorReport {
            snapshot: self.current.clone().unwrap_or_default(),
            frames_captured: self.frames_sent,
            analysis_date: Utc::now(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
