use serde::{Deserialize, Serialize};

use super::types::FrameAnalysisEntry;

const MAX_AUDIO_LEVELS: usize = 20;
const KEEP_AUDIO_LEVELS: usize = 10;
const MAX_FRAME_ANALYSES: usize = 50;
const KEEP_FRAME_ANALYSES: usize = 30;

/// Append-only buffer that drops down to the newest `keep` items once it
/// grows past `cap`.
pub(crate) fn push_bounded<T>(items: &mut Vec<T>, item: T, cap: usize, keep: usize) {
    items.push(item);
    if items.len() > cap {
        let excess = items.len() - keep;
        items.drain(..excess);
    }
}

/// Running counters for one session plus two short rolling windows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsAccumulator {
    pub face_detections: u64,
    pub look_away_count: u64,
    pub tab_switches: u64,
    pub window_blurs: u64,
    pub suspicious_keystrokes: u64,
    pub audio_levels: Vec<f32>,
    pub frame_analysis: Vec<FrameAnalysisEntry>,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_audio_level(&mut self, level: f32) {
        push_bounded(
            &mut self.audio_levels,
            level,
            MAX_AUDIO_LEVELS,
            KEEP_AUDIO_LEVELS,
        );
    }

    pub fn push_frame_analysis(&mut self, entry: FrameAnalysisEntry) {
        if entry.face_detected {
            self.face_detections += 1;
        }
        push_bounded(
            &mut self.frame_analysis,
            entry,
            MAX_FRAME_ANALYSES,
            KEEP_FRAME_ANALYSES,
        );
    }

    /// Share of the last `window` frame analyses that found a face; 0 when empty.
    pub fn face_detection_rate(&self, window: usize) -> f64 {
        let start = self.frame_analysis.len().saturating_sub(window);
        let recent = &self.frame_analysis[start..];
        if recent.is_empty() {
            return 0.0;
        }
        let detected = recent.iter().filter(|f| f.face_detected).count();
        detected as f64 / recent.len() as f64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
