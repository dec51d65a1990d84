use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::behavior::{
    BehaviorAnalyzer, BehaviorReport, BehaviorSnapshot, BehaviorTracker, DisabledAnalyzer,
    HttpBehaviorClient,
};
use crate::capture::{AudioLevelProbe, FrameSampler, SimulatedAudioProbe, VideoSource};
use crate::environment::EnvironmentPort;
use crate::integrity::{IntegrityEngine, IntegritySnapshot};
use crate::settings::MonitorSettings;

use super::events::{MonitorEvent, MonitorReport};
use super::state::{SessionState, SessionStatus};
use super::workers::{WorkerContext, Workers};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::session";

use crate::{log_info, log_warn};

const EVENT_CAPACITY: usize = 64;

/// Owns one monitoring session: its timers, capture surface and scoring state.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    ctx: WorkerContext,
    environment: Arc<dyn EnvironmentPort>,
    workers: Arc<Mutex<Option<Workers>>>,
}

impl SessionController {
    pub fn new(
        settings: &MonitorSettings,
        analyzer: Arc<dyn BehaviorAnalyzer>,
        environment: Arc<dyn EnvironmentPort>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let ctx = WorkerContext {
            engine: Arc::new(Mutex::new(IntegrityEngine::new(
                settings.heuristics.clone(),
                settings.scoring.clone(),
            ))),
            behavior: Arc::new(Mutex::new(BehaviorTracker::new())),
            sampler: Arc::new(Mutex::new(FrameSampler::new(
                settings.capture.min_ready_state,
            ))),
            audio: Arc::new(Mutex::new(Box::new(SimulatedAudioProbe) as Box<dyn AudioLevelProbe>)),
            analyzer,
            events,
            cadence: settings.cadence.clone(),
            jpeg_quality: settings.capture.jpeg_quality,
        };

        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            ctx,
            environment,
            workers: Arc::new(Mutex::new(None)),
        }
    }

    /// Build a controller whose analyzer comes from `settings.analyzer`.
    pub fn from_settings(
        settings: &MonitorSettings,
        environment: Arc<dyn EnvironmentPort>,
    ) -> Result<Self> {
        let analyzer: Arc<dyn BehaviorAnalyzer> = match &settings.analyzer.endpoint {
            Some(endpoint) => {
                log_info!("behavior analyzer endpoint: {endpoint}");
                Arc::new(HttpBehaviorClient::new(
                    endpoint.clone(),
                    settings.analyzer.bearer_token.clone(),
                    settings.analyzer.timeout(),
                )?)
            }
            None => {
                log_warn!("no behavior analyzer endpoint configured");
                Arc::new(DisabledAnalyzer)
            }
        };
        Ok(Self::new(settings, analyzer, environment))
    }

    /// Swap the audio level probe. Takes effect on the next analysis cycle.
    pub fn with_audio_probe(self, probe: Box<dyn AudioLevelProbe>) -> Self {
        Self {
            ctx: WorkerContext {
                audio: Arc::new(Mutex::new(probe)),
                ..self.ctx
            },
            ..self
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.ctx.events.subscribe()
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    /// Acquire `source` and start the analysis, emission, behavior and
    /// environment workers. Only valid from `Idle`.
    pub async fn start(&self, source: Box<dyn VideoSource>) -> Result<broadcast::Receiver<MonitorEvent>> {
        let mut state = self.state.lock().await;
        match state.status {
            SessionStatus::Idle => {}
            SessionStatus::Active => return Err(anyhow!("session already active")),
            SessionStatus::Stopped => {
                return Err(anyhow!("session stopped; reset before starting again"))
            }
        }

        self.ctx.sampler.lock().await.initialize(source)?;
        self.ctx.engine.lock().await.reset();

        let session_id = Uuid::new_v4().to_string();
        state.begin(session_id.clone(), Utc::now());

        let receiver = self.subscribe();
        let environment = self.environment.subscribe();
        *self.workers.lock().await = Some(Workers::spawn(&self.ctx, environment));

        log_info!("monitoring session {session_id} started");
        self.publish(MonitorEvent::StatusChanged(SessionStatus::Active));
        Ok(receiver)
    }

    /// Stop every worker, release the capture surface and return the final report.
    /// Violations and metrics are kept until `reset`.
    pub async fn stop(&self) -> Result<MonitorReport> {
        let mut state = self.state.lock().await;
        if !state.is_active() {
            return Err(anyhow!("no active session to stop"));
        }

        if let Some(workers) = self.workers.lock().await.take() {
            workers.shutdown().await;
        }
        self.ctx.sampler.lock().await.release();

        let stopped_at = Utc::now();
        state.stop(stopped_at);
        let session_id = state.session_id.clone();
        drop(state);

        let report = self.build_report(session_id, stopped_at).await;
        log_info!(
            "monitoring session stopped: score={} violations={}",
            report.integrity.snapshot.integrity_score,
            report.integrity.snapshot.violations_count
        );
        self.publish(MonitorEvent::StatusChanged(SessionStatus::Stopped));
        Ok(report)
    }

    /// Clear violations, counters and behavior state. Rejected while active.
    pub async fn reset(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.is_active() {
            return Err(anyhow!("cannot reset an active session"));
        }

        self.ctx.engine.lock().await.reset();
        self.ctx.behavior.lock().await.reset();
        state.reset();

        self.publish(MonitorEvent::StatusChanged(SessionStatus::Idle));
        Ok(())
    }

    pub async fn snapshot(&self) -> IntegritySnapshot {
        self.ctx.engine.lock().await.snapshot()
    }

    pub async fn behavior(&self) -> Option<BehaviorSnapshot> {
        self.ctx.behavior.lock().await.current().cloned()
    }

    pub async fn behavior_report(&self) -> BehaviorReport {
        self.ctx.behavior.lock().await.report()
    }

    /// Report for the current or most recent session. Once stopped, the
    /// report ends at the stop time.
    pub async fn report(&self) -> MonitorReport {
        let (session_id, ended_at) = {
            let state = self.state.lock().await;
            (state.session_id.clone(), state.stopped_at.unwrap_or_else(Utc::now))
        };
        self.build_report(session_id, ended_at).await
    }

    async fn build_report(&self, session_id: Option<String>, ended_at: DateTime<Utc>) -> MonitorReport {
        let integrity = self.ctx.engine.lock().await.report(session_id, ended_at);
        let behavior = self.ctx.behavior.lock().await.report();
        MonitorReport {
            integrity,
            behavior,
        }
    }

    fn publish(&self, event: MonitorEvent) {
        let _ = self.ctx.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{FixedAudioProbe, ImageSequenceSource};
    use crate::environment::{ChannelEnvironment, DetachedEnvironment, EnvironmentEvent, KeyEvent};
    use crate::integrity::{IntegrityStatus, Severity, ViolationKind};
    use image::{Rgba, RgbaImage};
    use std::time::Duration;

    fn dark_source() -> Box<dyn VideoSource> {
        Box::new(ImageSequenceSource::new(vec![RgbaImage::from_pixel(
            320,
            240,
            Rgba([0, 0, 0, 255]),
        )]))
    }

    fn controller(environment: Arc<dyn EnvironmentPort>) -> SessionController {
        SessionController::new(
            &MonitorSettings::default(),
            Arc::new(DisabledAnalyzer),
            environment,
        )
        .with_audio_probe(Box::new(FixedAudioProbe(10.0)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_faceless_session_records_single_absence() {
        let controller = controller(Arc::new(DetachedEnvironment));
        controller.start(dark_source()).await.unwrap();

        // Analysis cycles at 2, 4, 6 and 8 seconds; only the fourth fires.
        tokio::time::sleep(Duration::from_millis(8_100)).await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.violations_count, 1);
        assert_eq!(snapshot.violations[0].kind, ViolationKind::NoFaceDetected);
        assert_eq!(snapshot.violations[0].severity, Severity::High);
        assert_eq!(snapshot.integrity_score, 90);
        assert_eq!(snapshot.status, IntegrityStatus::Suspicious);
        assert_eq!(snapshot.metrics.look_away_count, 1);
        assert_eq!(snapshot.metrics.audio_levels, vec![10.0; 4]);

        let report = controller.stop().await.unwrap();
        assert_eq!(report.integrity.snapshot.violations_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_environment_events_become_violations() {
        let environment = ChannelEnvironment::new();
        let handle = environment.handle();
        let controller = controller(Arc::new(environment));
        controller.start(dark_source()).await.unwrap();

        assert!(handle.emit(EnvironmentEvent::VisibilityHidden));
        assert!(handle.emit(EnvironmentEvent::KeyDown(KeyEvent::plain("F12"))));
        assert!(handle.emit(EnvironmentEvent::KeyDown(KeyEvent::plain("a"))));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.violations_count, 2);
        assert_eq!(snapshot.metrics.tab_switches, 1);
        assert_eq!(snapshot.metrics.suspicious_keystrokes, 1);
        assert_eq!(snapshot.integrity_score, 93);

        controller.stop().await.unwrap();
        assert!(!handle.emit(EnvironmentEvent::WindowBlur));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_emissions() {
        let controller = controller(Arc::new(DetachedEnvironment));
        let mut rx = controller.start(dark_source()).await.unwrap();

        match rx.recv().await.unwrap() {
            MonitorEvent::StatusChanged(status) => assert_eq!(status, SessionStatus::Active),
            other => panic!("unexpected event {other:?}"),
        }
        match rx.recv().await.unwrap() {
            MonitorEvent::IntegrityUpdated(snapshot) => {
                assert_eq!(snapshot.integrity_score, 100);
                assert_eq!(snapshot.status, IntegrityStatus::Clean);
            }
            other => panic!("unexpected event {other:?}"),
        }
        match rx.recv().await.unwrap() {
            MonitorEvent::BehaviorUpdated(snapshot) => {
                assert_eq!(snapshot.attention_score, 85.0);
                assert_eq!(snapshot.emotional_state, "focused");
            }
            other => panic!("unexpected event {other:?}"),
        }

        assert_eq!(
            controller.behavior().await.map(|b| b.attention_score),
            Some(85.0)
        );
        controller.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_rules() {
        let controller = controller(Arc::new(DetachedEnvironment));
        assert!(controller.stop().await.is_err());

        controller.start(dark_source()).await.unwrap();
        assert_eq!(controller.status().await, SessionStatus::Active);
        assert!(controller.start(dark_source()).await.is_err());
        assert!(controller.reset().await.is_err());

        tokio::time::sleep(Duration::from_millis(8_100)).await;
        let report = controller.stop().await.unwrap();
        assert_eq!(controller.status().await, SessionStatus::Stopped);
        assert!(report.integrity.session_id.is_some());
        assert_eq!(report.integrity.violations_by_type[&ViolationKind::NoFaceDetected], 1);

        // Stopping keeps the ledger; starting again needs a reset first.
        assert_eq!(controller.snapshot().await.violations_count, 1);
        assert!(controller.start(dark_source()).await.is_err());

        controller.reset().await.unwrap();
        assert_eq!(controller.status().await, SessionStatus::Idle);
        assert_eq!(controller.snapshot().await.violations_count, 0);
        assert!(controller.behavior().await.is_none());

        controller.start(dark_source()).await.unwrap();
        controller.stop().await.unwrap();
    }

    #[derive(Debug, Default, PartialEq)]
    struct EventCounts {
        integrity: usize,
        behavior: usize,
        status: usize,
    }

    fn drain(rx: &mut broadcast::Receiver<MonitorEvent>) -> EventCounts {
        let mut counts = EventCounts::default();
        while let Ok(event) = rx.try_recv() {
            match event {
                MonitorEvent::IntegrityUpdated(_) => counts.integrity += 1,
                MonitorEvent::BehaviorUpdated(_) => counts.behavior += 1,
                MonitorEvent::StatusChanged(_) => counts.status += 1,
            }
        }
        counts
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_emission_until_stop() {
        let controller = controller(Arc::new(DetachedEnvironment));
        let mut rx = controller.start(dark_source()).await.unwrap();

        // Emissions at 0.5, 5 and 10 s; analysis at 2, 4, 6, 8 and 10 s.
        tokio::time::sleep(Duration::from_millis(10_100)).await;
        assert_eq!(
            drain(&mut rx),
            EventCounts {
                integrity: 3,
                behavior: 1,
                status: 1,
            }
        );
        assert_eq!(controller.snapshot().await.metrics.frame_analysis.len(), 5);

        controller.stop().await.unwrap();
        assert_eq!(
            drain(&mut rx),
            EventCounts {
                status: 1,
                ..EventCounts::default()
            }
        );

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(drain(&mut rx), EventCounts::default());
        assert_eq!(controller.snapshot().await.metrics.frame_analysis.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_tab_switches_each_count() {
        let environment = ChannelEnvironment::new();
        let handle = environment.handle();
        let controller = controller(Arc::new(environment));
        controller.start(dark_source()).await.unwrap();

        for _ in 0..3 {
            assert!(handle.emit(EnvironmentEvent::VisibilityHidden));
            assert!(handle.emit(EnvironmentEvent::VisibilityVisible));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.violations_count, 3);
        assert_eq!(snapshot.metrics.tab_switches, 3);
        assert!(snapshot
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::TabSwitch && v.severity == Severity::Medium));

        controller.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_ends_at_stop_time() {
        let controller = controller(Arc::new(DetachedEnvironment));
        controller.start(dark_source()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(4_100)).await;

        let stopped = controller.stop().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        let later = controller.report().await;

        assert_eq!(later.integrity.end_time, stopped.integrity.end_time);
        assert_eq!(later.integrity.duration_ms, stopped.integrity.duration_ms);
        assert_eq!(later.integrity.start_time, stopped.integrity.start_time);
    }
}
