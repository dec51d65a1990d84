use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::analysis::{CycleOutcome, HeuristicAnalyzer, HeuristicConfig};
use crate::capture::VideoFrame;

use super::ledger::ViolationLedger;
use super::metrics::MetricsAccumulator;
use super::scoring::{
    classify_status, compute_integrity_score, group_by_severity, group_by_type, recommendations,
    ScoringConfig,
};
use super::types::{Finding, IntegrityReport, IntegritySnapshot, Severity, Violation, ViolationKind};

const RECENT_VIOLATIONS: usize = 5;

/// Session-scoped integrity state: ledger, counters, and the frame heuristics
/// that feed them.
#[derive(Debug, Clone)]
pub struct IntegrityEngine {
    analyzer: HeuristicAnalyzer,
    scoring: ScoringConfig,
    ledger: ViolationLedger,
    metrics: MetricsAccumulator,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl IntegrityEngine {
    pub fn new(heuristics: HeuristicConfig, scoring: ScoringConfig) -> Self {
        Self {
            analyzer: HeuristicAnalyzer::new(heuristics),
            scoring,
            ledger: ViolationLedger::new(),
            metrics: MetricsAccumulator::new(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Run one heuristic cycle and fold its findings into the ledger.
    pub fn analyze_frame(
        &mut self,
        current: &VideoFrame,
        previous: Option<&VideoFrame>,
    ) -> CycleOutcome {
        let outcome = self.analyzer.analyze(current, previous);
        for finding in &outcome.findings {
            self.apply_finding(finding.clone());
        }
        self.metrics.push_frame_analysis(outcome.entry.clone());
        outcome
    }

    /// Append a finding and bump the counter its kind maps to.
    pub fn apply_finding(&mut self, finding: Finding) -> &Violation {
        match finding.kind {
            ViolationKind::NoFaceDetected => self.metrics.look_away_count += 1,
            ViolationKind::TabSwitch => self.metrics.tab_switches += 1,
            ViolationKind::WindowBlur => self.metrics.window_blurs += 1,
            ViolationKind::SuspiciousKeystroke => self.metrics.suspicious_keystrokes += 1,
            ViolationKind::ExcessiveMotion => {}
        }
        let elapsed = self.started.elapsed();
        self.ledger.record_finding(finding, elapsed)
    }

    pub fn record(
        &mut self,
        kind: ViolationKind,
        description: impl Into<String>,
        severity: Severity,
    ) -> &Violation {
        self.apply_finding(Finding::new(kind, description, severity))
    }

    pub fn record_audio_level(&mut self, level: f32) {
        self.metrics.push_audio_level(level);
    }

    pub fn integrity_score(&self) -> u8 {
        compute_integrity_score(self.ledger.entries(), &self.metrics, &self.scoring)
    }

    pub fn violations(&self) -> &[Violation] {
        self.ledger.entries()
    }

    pub fn metrics(&self) -> &MetricsAccumulator {
        &self.metrics
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn snapshot(&self) -> IntegritySnapshot {
        let violations = self.ledger.entries();
        IntegritySnapshot {
            integrity_score: self.integrity_score(),
            violations: violations.to_vec(),
            violations_count: violations.len(),
            recent_violations: self.ledger.recent(RECENT_VIOLATIONS).to_vec(),
            metrics: self.metrics.clone(),
            uptime_ms: self.uptime_ms(),
            status: classify_status(violations),
        }
    }

    pub fn report(&self, session_id: Option<String>, ended_at: DateTime<Utc>) -> IntegrityReport {
        let violations = self.ledger.entries();
        let duration_ms = (ended_at - self.started_at).num_milliseconds().max(0) as u64;

        IntegrityReport {
            session_id,
            start_time: self.started_at,
            end_time: ended_at,
            duration_ms,
            snapshot: self.snapshot(),
            violations_by_type: group_by_type(violations),
            violations_by_severity: group_by_severity(violations),
            recommendations: recommendations(&self.metrics),
        }
    }

    /// Clear violations and counters and restart the session clock.
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.metrics.reset();
        self.analyzer.reset();
        self.started_at = Utc::now();
        self.started = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::IntegrityStatus;

    fn engine() -> IntegrityEngine {
        IntegrityEngine::new(HeuristicConfig::default(), ScoringConfig::default())
    }

    #[test]
    fn test_four_faceless_cycles_record_one_high_violation() {
        let mut engine = engine();
        let dark = VideoFrame::filled(320, 240, [20, 20, 20]);

        engine.analyze_frame(&dark, None);
        for _ in 0..3 {
            engine.analyze_frame(&dark, Some(&dark));
        }

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.violations_count, 1);
        assert_eq!(snapshot.violations[0].kind, ViolationKind::NoFaceDetected);
        assert_eq!(snapshot.violations[0].severity, Severity::High);
        assert_eq!(snapshot.integrity_score, 90);
        assert_eq!(snapshot.status, IntegrityStatus::Suspicious);
        assert_eq!(snapshot.metrics.look_away_count, 1);
        assert_eq!(snapshot.metrics.frame_analysis.len(), 4);
    }

    #[test]
    fn test_critical_plus_low_scores_seventy_eight() {
        let mut engine = engine();
        engine.record(ViolationKind::ExcessiveMotion, "manual", Severity::Critical);
        engine.record(ViolationKind::SuspiciousKeystroke, "F12", Severity::Low);

        assert_eq!(engine.integrity_score(), 78);
        assert_eq!(engine.snapshot().status, IntegrityStatus::Warning);
    }

    #[test]
    fn test_findings_bump_counters() {
        let mut engine = engine();
        engine.record(ViolationKind::TabSwitch, "hidden", Severity::Medium);
        engine.record(ViolationKind::WindowBlur, "blur", Severity::Medium);
        engine.record(ViolationKind::SuspiciousKeystroke, "F5", Severity::Low);

        let metrics = engine.metrics();
        assert_eq!(metrics.tab_switches, 1);
        assert_eq!(metrics.window_blurs, 1);
        assert_eq!(metrics.suspicious_keystrokes, 1);
    }

    #[test]
    fn test_recent_violations_capped_at_five() {
        let mut engine = engine();
        for _ in 0..8 {
            engine.record(ViolationKind::TabSwitch, "hidden", Severity::Medium);
        }
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.violations_count, 8);
        assert_eq!(snapshot.recent_violations.len(), 5);
        assert_eq!(snapshot.recent_violations[4], snapshot.violations[7]);
    }

    #[test]
    fn test_report_groups_and_recommends() {
        let mut engine = engine();
        for _ in 0..3 {
            engine.record(ViolationKind::TabSwitch, "hidden", Severity::Medium);
        }
        let report = engine.report(Some("s-1".into()), Utc::now());

        assert_eq!(report.violations_by_type.get(&ViolationKind::TabSwitch), Some(&3));
        assert_eq!(report.violations_by_severity.medium, 3);
        assert_eq!(report.snapshot.integrity_score, 85);
        assert_eq!(
            report.recommendations,
            vec!["Avoid switching tabs during the interview".to_string()]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["integrityScore"], 85);
        assert_eq!(json["violationsByType"]["tab_switch"], 3);
        assert_eq!(json["violations"][0]["type"], "tab_switch");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = engine();
        let before = engine.started_at();
        engine.record(ViolationKind::TabSwitch, "hidden", Severity::Medium);
        engine.record_audio_level(40.0);
        engine.reset();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.violations_count, 0);
        assert_eq!(snapshot.metrics, MetricsAccumulator::default());
        assert_eq!(snapshot.status, IntegrityStatus::Clean);
        assert!(engine.started_at() >= before);
    }
}
