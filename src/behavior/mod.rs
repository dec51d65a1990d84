pub mod client;
pub mod tracker;
pub mod types;

pub use client::{
    parse_analysis_response, BehaviorAnalyzer, BehaviorError, DisabledAnalyzer, HttpBehaviorClient,
};
pub use tracker::BehaviorTracker;
pub use types::{
    AnalyzeFrameRequest, BehaviorReport, BehaviorSnapshot, BehaviorUpdate, TechnicalQuality,
};
