use serde::{Deserialize, Serialize};

use crate::behavior::{BehaviorReport, BehaviorSnapshot};
use crate::integrity::{IntegrityReport, IntegritySnapshot};

use super::state::SessionStatus;

/// Everything the controller pushes to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum MonitorEvent {
    IntegrityUpdated(IntegritySnapshot),
    BehaviorUpdated(BehaviorSnapshot),
    StatusChanged(SessionStatus),
}

/// Final result handed to the interview-scoring workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorReport {
    pub integrity: IntegrityReport,
    pub behavior: BehaviorReport,
}
