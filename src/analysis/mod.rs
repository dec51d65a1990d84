pub mod config;
pub mod face;
pub mod motion;

pub use config::HeuristicConfig;
pub use face::{detect_face, is_skin_color, AbsenceTracker, FacePresence};
pub use motion::motion_magnitude;

use chrono::Utc;

use crate::capture::VideoFrame;
use crate::integrity::{Finding, FrameAnalysisEntry, Severity, ViolationKind};

/// Everything one analysis cycle produced.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub face: FacePresence,
    pub motion: Option<f64>,
    pub entry: FrameAnalysisEntry,
    pub findings: Vec<Finding>,
}

impl CycleOutcome {
    /// True when the cycle raised a "no face" finding.
    pub fn face_absence_fired(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.kind == ViolationKind::NoFaceDetected)
    }
}

/// Face and motion checks run against the current frame and the one before it.
///
/// The only state carried between cycles is the consecutive-absence run.
#[derive(Debug, Clone)]
pub struct HeuristicAnalyzer {
    config: HeuristicConfig,
    absence: AbsenceTracker,
}

impl HeuristicAnalyzer {
    pub fn new(config: HeuristicConfig) -> Self {
        Self {
            config,
            absence: AbsenceTracker::new(),
        }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    pub fn analyze(&mut self, current: &VideoFrame, previous: Option<&VideoFrame>) -> CycleOutcome {
        let mut findings = Vec::new();

        let face = detect_face(current, &self.config);
        if self
            .absence
            .observe(face.detected, self.config.absence_threshold)
        {
            findings.push(Finding::new(
                ViolationKind::NoFaceDetected,
                "No face detected in frame",
                Severity::High,
            ));
        }

        let motion = motion_magnitude(current, previous, &self.config);
        if let Some(magnitude) = motion {
            if magnitude > self.config.motion_threshold {
                findings.push(Finding::new(
                    ViolationKind::ExcessiveMotion,
                    format!("Excessive movement detected (avg delta {magnitude:.1})"),
                    Severity::Medium,
                ));
            }
        }

        CycleOutcome {
            face,
            motion,
            entry: FrameAnalysisEntry {
                timestamp: Utc::now(),
                face_detected: face.detected,
                skin_samples: face.skin_samples,
            },
            findings,
        }
    }

    pub fn reset(&mut self) {
        self.absence.reset();
    }
}
