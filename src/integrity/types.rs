use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metrics::MetricsAccumulator;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    NoFaceDetected,
    ExcessiveMotion,
    TabSwitch,
    WindowBlur,
    SuspiciousKeystroke,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::NoFaceDetected => "no_face_detected",
            ViolationKind::ExcessiveMotion => "excessive_motion",
            ViolationKind::TabSwitch => "tab_switch",
            ViolationKind::WindowBlur => "window_blur",
            ViolationKind::SuspiciousKeystroke => "suspicious_keystroke",
        }
    }
}

/// A rule trigger, before it is stamped and appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: ViolationKind,
    pub description: String,
    pub severity: Severity,
}

impl Finding {
    pub fn new(kind: ViolationKind, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind,
            description: description.into(),
            severity,
        }
    }
}

/// Immutable record of one detected integrity concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub description: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    /// Milliseconds since the session started.
    pub elapsed_ms: u64,
}

/// Outcome of one face check, kept in the rolling frame window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalysisEntry {
    pub timestamp: DateTime<Utc>,
    pub face_detected: bool,
    pub skin_samples: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityStatus {
    Clean,
    Warning,
    Suspicious,
}

/// What subscribers receive on every emission tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntegritySnapshot {
    pub integrity_score: u8,
    pub violations: Vec<Violation>,
    pub violations_count: usize,
    pub recent_violations: Vec<Violation>,
    pub metrics: MetricsAccumulator,
    /// Milliseconds since the session started.
    pub uptime_ms: u64,
    pub status: IntegrityStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityBreakdown {
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

/// Final integrity summary handed to the interview-scoring workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub session_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub snapshot: IntegritySnapshot,
    pub violations_by_type: BTreeMap<ViolationKind, usize>,
    pub violations_by_severity: SeverityBreakdown,
    pub recommendations: Vec<String>,
}
