//! Client for the remote vision analyzer.
//!
//! One POST per escalated frame, no retries: a failed cycle is simply skipped
//! and the next scheduled tick tries again.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use super::types::{AnalyzeFrameRequest, AnalyzeFrameResponse, BehaviorUpdate};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::behavior";

use crate::log_debug;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analyzer returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("analyzer response has no analysis")]
    MissingAnalysis,

    #[error("no analyzer endpoint configured")]
    NotConfigured,

    #[error("frame encoding failed: {0}")]
    Encode(String),
}

/// Anything that can turn an encoded frame into a behavior update.
#[async_trait]
pub trait BehaviorAnalyzer: Send + Sync {
    async fn analyze(&self, request: &AnalyzeFrameRequest) -> Result<BehaviorUpdate, BehaviorError>;

    /// False lets the session skip capturing and encoding frames altogether.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Parse an analyzer response body; a body without `analysis` is a skipped cycle.
pub fn parse_analysis_response(body: &str) -> Result<BehaviorUpdate, BehaviorError> {
    let response: AnalyzeFrameResponse = serde_json::from_str(body)?;
    response.analysis.ok_or(BehaviorError::MissingAnalysis)
}

/// POSTs `{ image, timestamp }` as JSON to the configured endpoint.
#[derive(Clone)]
pub struct HttpBehaviorClient {
    client: Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl HttpBehaviorClient {
    pub fn new(
        endpoint: impl Into<String>,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BehaviorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            bearer_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BehaviorAnalyzer for HttpBehaviorClient {
    async fn analyze(&self, request: &AnalyzeFrameRequest) -> Result<BehaviorUpdate, BehaviorError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BehaviorError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        log_debug!("analyzer responded with {} bytes", body.len());
        parse_analysis_response(&body)
    }
}

/// Analyzer used when no endpoint is configured; every cycle is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAnalyzer;

#[async_trait]
impl BehaviorAnalyzer for DisabledAnalyzer {
    async fn analyze(&self, _request: &AnalyzeFrameRequest) -> Result<BehaviorUpdate, BehaviorError> {
        Err(BehaviorError::NotConfigured)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_full_analysis() {
        let body = r#"{
            "success": true,
            "analysis": {
                "attentionScore": 72,
                "engagementLevel": "medium",
                "emotionalState": "nervous",
                "confidenceLevel": "low",
                "eyeContact": "poor",
                "bodyLanguage": "closed",
                "suspiciousActivities": ["looking off-screen"],
                "technicalQuality": {
                    "lighting": "poor",
                    "cameraAngle": "average",
                    "backgroundQuality": "acceptable"
                },
                "overallAssessment": "concerning",
                "recommendations": ["Face the camera"],
                "violations": ["possible second screen"],
                "timestamp": "2024-01-01T00:00:00Z"
            }
        }"#;

        let update = parse_analysis_response(body).unwrap();
        assert_eq!(update.attention_score, Some(72.0));
        assert_eq!(update.eye_contact.as_deref(), Some("poor"));
        assert_eq!(
            update.technical_quality.unwrap().camera_angle,
            "average".to_string()
        );
        assert_eq!(update.violations.unwrap(), vec!["possible second screen"]);
    }

    #[test]
    fn test_partial_technical_quality_is_accepted() {
        let body = r#"{
            "analysis": {
                "attentionScore": 64,
                "technicalQuality": { "lighting": "poor" }
            }
        }"#;

        let update = parse_analysis_response(body).unwrap();
        let quality = update.technical_quality.unwrap();
        assert_eq!(quality.lighting, "poor");
        assert_eq!(quality.camera_angle, "");
        assert_eq!(quality.background_quality, "");
        assert_eq!(update.attention_score, Some(64.0));
    }

    #[test]
    fn test_missing_analysis_is_rejected() {
        let err = parse_analysis_response(r#"{"success": false}"#).unwrap_err();
        assert!(matches!(err, BehaviorError::MissingAnalysis));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert!(matches!(
            parse_analysis_response("<html>bad gateway</html>"),
            Err(BehaviorError::Parse(_))
        ));
        assert!(matches!(
            parse_analysis_response(r#"{"analysis": {"attentionScore": "very"}}"#),
            Err(BehaviorError::Parse(_))
        ));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = AnalyzeFrameRequest {
            image: "data:image/jpeg;base64,AAAA".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["image"], "data:image/jpeg;base64,AAAA");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
    }

    #[tokio::test]
    async fn test_disabled_analyzer_always_skips() {
        let request = AnalyzeFrameRequest {
            image: String::new(),
            timestamp: Utc::now(),
        };
        assert!(matches!(
            DisabledAnalyzer.analyze(&request).await,
            Err(BehaviorError::NotConfigured)
        ));
        assert!(!DisabledAnalyzer.is_enabled());
    }
}
