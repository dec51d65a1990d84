use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalQuality {
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub camera_angle: String,
    #[serde(default)]
    pub background_quality: String,
}

/// Latest judgment of the remote vision analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorSnapshot {
    pub attention_score: f64,
    pub engagement_level: String,
    pub emotional_state: String,
    pub confidence_level: String,
    pub eye_contact: Option<String>,
    pub body_language: Option<String>,
    pub suspicious_activities: Vec<String>,
    pub technical_quality: Option<TechnicalQuality>,
    pub overall_assessment: Option<String>,
    pub recommendations: Vec<String>,
    /// Integrity concerns reported by the analyzer; kept apart from the local ledger.
    pub violations: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for BehaviorSnapshot {
    fn default() -> Self {
        Self {
            attention_score: 100.0,
            engagement_level: "high".into(),
            emotional_state: "neutral".into(),
            confidence_level: "medium".into(),
            eye_contact: None,
            body_language: None,
            suspicious_activities: Vec::new(),
            technical_quality: None,
            overall_assessment: None,
            recommendations: Vec::new(),
            violations: Vec::new(),
            updated_at: None,
        }
    }
}

/// Fields of the analyzer's `analysis` object. Every field is optional; a
/// present field replaces the stored value, an absent one keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorUpdate {
    pub attention_score: Option<f64>,
    pub engagement_level: Option<String>,
    pub emotional_state: Option<String>,
    pub confidence_level: Option<String>,
    pub eye_contact: Option<String>,
    pub body_language: Option<String>,
    pub suspicious_activities: Option<Vec<String>>,
    pub technical_quality: Option<TechnicalQuality>,
    pub overall_assessment: Option<String>,
    pub recommendations: Option<Vec<String>>,
    pub violations: Option<Vec<String>>,
}

impl BehaviorUpdate {
    /// Snapshot shown while the first real analysis is still in flight.
    pub fn interview_starting() -> Self {
        Self {
            attention_score: Some(85.0),
            engagement_level: Some("high".into()),
            emotional_state: Some("focused".into()),
            confidence_level: Some("medium".into()),
            eye_contact: Some("good".into()),
            body_language: Some("neutral".into()),
            suspicious_activities: Some(Vec::new()),
            technical_quality: Some(TechnicalQuality {
                lighting: "good".into(),
                camera_angle: "good".into(),
                background_quality: "professional".into(),
            }),
            overall_assessment: Some("good".into()),
            recommendations: Some(vec![
                "Interview starting - maintain natural behavior".into(),
            ]),
            violations: Some(Vec::new()),
        }
    }
}

impl BehaviorSnapshot {
    pub fn merge(&mut self, update: BehaviorUpdate, at: DateTime<Utc>) {
        if let Some(v) = update.attention_score {
            self.attention_score = v;
        }
        if let Some(v) = update.engagement_level {
            self.engagement_level = v;
        }
        if let Some(v) = update.emotional_state {
            self.emotional_state = v;
        }
        if let Some(v) = update.confidence_level {
            self.confidence_level = v;
        }
        if update.eye_contact.is_some() {
            self.eye_contact = update.eye_contact;
        }
        if update.body_language.is_some() {
            self.body_language = update.body_language;
        }
        if let Some(v) = update.suspicious_activities {
            self.suspicious_activities = v;
        }
        if update.technical_quality.is_some() {
            self.technical_quality = update.technical_quality;
        }
        if update.overall_assessment.is_some() {
            self.overall_assessment = update.overall_assessment;
        }
        if let Some(v) = update.recommendations {
            self.recommendations = v;
        }
        if let Some(v) = update.violations {
            self.violations = v;
        }
        self.updated_at = Some(at);
    }
}

/// Body POSTed to the analyzer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeFrameRequest {
    /// `data:image/jpeg;base64,...`
    pub image: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnalyzeFrameResponse {
    pub analysis: Option<BehaviorUpdate>,
}

/// Behavior half of the final report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorReport {
    #[serde(flatten)]
    pub snapshot: BehaviorSnapshot,
    pub frames_captured: u64,
    pub analysis_date: DateTime<Utc>,
}
