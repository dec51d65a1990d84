//! Live integrity and behavior monitoring for a remote interview session.
//!
//! A [`SessionController`] samples a [`VideoSource`] on fixed cadences, runs
//! face and motion heuristics, folds environment signals into a violation
//! ledger, escalates frames to a remote [`BehaviorAnalyzer`], and pushes
//! [`MonitorEvent`]s to subscribers until stopped.

pub mod analysis;
pub mod behavior;
pub mod capture;
pub mod environment;
pub mod integrity;
pub mod session;
pub mod settings;
pub mod utils;

pub use behavior::{BehaviorAnalyzer, BehaviorSnapshot, DisabledAnalyzer, HttpBehaviorClient};
pub use capture::{ImageSequenceSource, ReadyState, VideoFrame, VideoSource};
pub use environment::{ChannelEnvironment, DetachedEnvironment, EnvironmentEvent, EnvironmentPort};
pub use integrity::{IntegrityReport, IntegritySnapshot, IntegrityStatus, Severity, Violation};
pub use session::{MonitorEvent, MonitorReport, SessionController, SessionStatus};
pub use settings::{MonitorSettings, SettingsStore};
pub use utils::init_logging;
