use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use super::metrics::push_bounded;
use super::types::{Finding, Severity, Violation, ViolationKind};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::integrity";

use crate::log_warn;

const MAX_VIOLATIONS: usize = 100;
const KEEP_VIOLATIONS: usize = 50;

/// Append-only violation log with oldest-first truncation.
#[derive(Debug, Clone, Default)]
pub struct ViolationLedger {
    entries: Vec<Violation>,
}

impl ViolationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: ViolationKind,
        description: impl Into<String>,
        severity: Severity,
        elapsed: Duration,
    ) -> &Violation {
        let violation = Violation {
            id: Uuid::new_v4(),
            kind,
            description: description.into(),
            severity,
            timestamp: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
        };

        log_warn!(
            "integrity violation [{}] {}: {} (+{}ms)",
            violation.severity.as_str(),
            violation.kind.as_str(),
            violation.description,
            violation.elapsed_ms
        );

        push_bounded(&mut self.entries, violation, MAX_VIOLATIONS, KEEP_VIOLATIONS);
        // Non-empty: we just pushed.
        &self.entries[self.entries.len() - 1]
    }

    pub fn record_finding(&mut self, finding: Finding, elapsed: Duration) -> &Violation {
        self.record(finding.kind, finding.description, finding.severity, elapsed)
    }

    pub fn entries(&self) -> &[Violation] {
        &self.entries
    }

    /// The newest `count` violations, oldest first.
    pub fn recent(&self, count: usize) -> &[Violation] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
