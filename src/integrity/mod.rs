pub mod engine;
pub mod ledger;
pub mod metrics;
pub mod scoring;
pub mod types;

pub use engine::IntegrityEngine;
pub use ledger::ViolationLedger;
pub use metrics::MetricsAccumulator;
pub use scoring::ScoringConfig;
pub use types::{
    Finding, FrameAnalysisEntry, IntegrityReport, IntegritySnapshot, IntegrityStatus, Severity,
    SeverityBreakdown, Violation, ViolationKind,
};
