use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metrics::MetricsAccumulator;
use super::types::{IntegrityStatus, Severity, SeverityBreakdown, Violation, ViolationKind};

/// Score weights and the face-detection bonus rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringConfig {
    pub penalty_low: i64,
    pub penalty_medium: i64,
    pub penalty_high: i64,
    pub penalty_critical: i64,

    /// How many of the latest frame analyses the bonus looks at.
    pub bonus_window: usize,

    /// Detection rate that must be strictly exceeded to earn the bonus.
    pub bonus_rate_threshold: f64,
    pub bonus_points: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            penalty_low: 2,
            penalty_medium: 5,
            penalty_high: 10,
            penalty_critical: 20,
            bonus_window: 10,
            bonus_rate_threshold: 0.8,
            bonus_points: 5,
        }
    }
}

impl ScoringConfig {
    pub fn penalty(&self, severity: Severity) -> i64 {
        match severity {
            Severity::Low => self.penalty_low,
            Severity::Medium => self.penalty_medium,
            Severity::High => self.penalty_high,
            Severity::Critical => self.penalty_critical,
        }
    }
}

/// 100 minus every recorded penalty, plus the detection bonus, clamped to 0..=100.
///
/// Past violations are never forgiven; only the bonus can offset them.
pub fn compute_integrity_score(
    violations: &[Violation],
    metrics: &MetricsAccumulator,
    config: &ScoringConfig,
) -> u8 {
    let penalties: i64 = violations.iter().map(|v| config.penalty(v.severity)).sum();
    let mut score = 100 - penalties;

    if metrics.face_detection_rate(config.bonus_window) > config.bonus_rate_threshold {
        score += config.bonus_points;
    }

    score.clamp(0, 100) as u8
}

/// Clean with no violations, suspicious once any `high` one exists, warning otherwise.
///
/// `critical` only weighs on the score, not on this classification.
pub fn classify_status(violations: &[Violation]) -> IntegrityStatus {
    if violations.is_empty() {
        IntegrityStatus::Clean
    } else if violations.iter().any(|v| v.severity == Severity::High) {
        IntegrityStatus::Suspicious
    } else {
        IntegrityStatus::Warning
    }
}

pub fn group_by_type(violations: &[Violation]) -> BTreeMap<ViolationKind, usize> {
    let mut groups = BTreeMap::new();
    for violation in violations {
        *groups.entry(violation.kind).or_insert(0) += 1;
    }
    groups
}

pub fn group_by_severity(violations: &[Violation]) -> SeverityBreakdown {
    let mut breakdown = SeverityBreakdown::default();
    for violation in violations {
        breakdown.add(violation.severity);
    }
    breakdown
}

pub fn recommendations(metrics: &MetricsAccumulator) -> Vec<String> {
    let mut out = Vec::new();

    if metrics.look_away_count > 5 {
        out.push("Maintain better eye contact with the camera".to_string());
    }
    if metrics.tab_switches > 2 {
        out.push("Avoid switching tabs during the interview".to_string());
    }
    if metrics.suspicious_keystrokes > 3 {
        out.push("Avoid using developer tools or shortcuts during the interview".to_string());
    }

    if out.is_empty() {
        out.push("Great job maintaining interview integrity!".to_string());
    }
    out
}
