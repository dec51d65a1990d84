use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::behavior::{
    AnalyzeFrameRequest, BehaviorAnalyzer, BehaviorError, BehaviorTracker, BehaviorUpdate,
};
use crate::capture::{encode_data_uri, AudioLevelProbe, FrameSampler};
use crate::environment::{classify, EnvironmentEvent};
use crate::integrity::IntegrityEngine;
use crate::settings::CadenceSettings;

use super::events::MonitorEvent;

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::session";

use crate::{log_debug, log_error, log_info, log_warn};

/// Shared handles every worker loop needs.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub engine: Arc<Mutex<IntegrityEngine>>,
    pub behavior: Arc<Mutex<BehaviorTracker>>,
    pub sampler: Arc<Mutex<FrameSampler>>,
    pub audio: Arc<Mutex<Box<dyn AudioLevelProbe>>>,
    pub analyzer: Arc<dyn BehaviorAnalyzer>,
    pub events: broadcast::Sender<MonitorEvent>,
    pub cadence: CadenceSettings,
    pub jpeg_quality: u8,
}

impl WorkerContext {
    fn publish(&self, event: MonitorEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Periodic ticker whose first tick lands one full period after `start`.
fn ticker_from(start: Instant, period: time::Duration) -> time::Interval {
    let mut ticker = time::interval_at(start + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Capture + heuristics every analysis period.
pub(crate) async fn analysis_loop(ctx: WorkerContext, cancel_token: CancellationToken) {
    let mut ticker = ticker_from(Instant::now(), ctx.cadence.analysis_every());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_analysis_cycle(&ctx).await;
            }
            _ = cancel_token.cancelled() => {
                log_info!("analysis loop shutting down");
                break;
            }
        }
    }
}

/// One capture + analysis cycle. Returns false when the cycle was skipped.
pub(crate) async fn run_analysis_cycle(ctx: &WorkerContext) -> bool {
    let mut sampler = ctx.sampler.lock().await;
    let Some(frames) = sampler.capture_frame() else {
        return false;
    };

    let mut engine = ctx.engine.lock().await;
    let outcome = engine.analyze_frame(frames.current, frames.previous);
    let level = ctx.audio.lock().await.sample();
    engine.record_audio_level(level);

    log_debug!(
        "cycle: face={} skin={} motion={:?} findings={}",
        outcome.face.detected,
        outcome.face.skin_samples,
        outcome.motion,
        outcome.findings.len()
    );
    true
}

/// Integrity snapshot shortly after start, then every emission period.
pub(crate) async fn emission_loop(ctx: WorkerContext, cancel_token: CancellationToken) {
    let start = Instant::now();

    tokio::select! {
        _ = time::sleep(ctx.cadence.emit_bootstrap()) => emit_integrity(&ctx).await,
        _ = cancel_token.cancelled() => return,
    }

    let mut ticker = ticker_from(start, ctx.cadence.emit_every());
    loop {
        tokio::select! {
            _ = ticker.tick() => emit_integrity(&ctx).await,
            _ = cancel_token.cancelled() => {
                log_info!("emission loop shutting down");
                break;
            }
        }
    }
}

pub(crate) async fn emit_integrity(ctx: &WorkerContext) {
    let snapshot = ctx.engine.lock().await.snapshot();
    ctx.publish(MonitorEvent::IntegrityUpdated(snapshot));
}

/// Bootstrap behavior snapshot, then one escalated frame per behavior period.
pub(crate) async fn behavior_loop(ctx: WorkerContext, cancel_token: CancellationToken) {
    let start = Instant::now();

    tokio::select! {
        _ = time::sleep(ctx.cadence.behavior_bootstrap()) => {
            let snapshot = ctx
                .behavior
                .lock()
                .await
                .apply(BehaviorUpdate::interview_starting());
            ctx.publish(MonitorEvent::BehaviorUpdated(snapshot));
        }
        _ = cancel_token.cancelled() => return,
    }

    if !ctx.analyzer.is_enabled() {
        log_info!("no behavior analyzer configured; remote analysis disabled");
        return;
    }

    let mut ticker = ticker_from(start, ctx.cadence.behavior_every());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // The request runs detached so a slow analyzer never stalls this ticker.
                let _ = run_behavior_cycle(&ctx).await;
            }
            _ = cancel_token.cancelled() => {
                log_info!("behavior loop shutting down");
                break;
            }
        }
    }
}

/// Encode the most recently analyzed frame, then spawn the analyzer request.
///
/// The spawned request is not tied to the session's cancellation: one that is
/// already in flight may still land after `stop`.
pub(crate) async fn run_behavior_cycle(ctx: &WorkerContext) -> Option<JoinHandle<()>> {
    let frame = ctx.sampler.lock().await.current_copy()?;

    let quality = ctx.jpeg_quality;
    let encoded = tokio::task::spawn_blocking(move || encode_data_uri(&frame, quality))
        .await
        .map_err(|err| BehaviorError::Encode(err.to_string()))
        .and_then(|res| res.map_err(|err| BehaviorError::Encode(format!("{err:#}"))));

    let image = match encoded {
        Ok(image) => image,
        Err(err) => {
            log_warn!("behavior frame skipped: {err}");
            return None;
        }
    };

    ctx.behavior.lock().await.note_frame_sent();
    let request = AnalyzeFrameRequest {
        image,
        timestamp: Utc::now(),
    };

    let ctx = ctx.clone();
    Some(tokio::spawn(async move {
        submit_frame(&ctx, request).await;
    }))
}

async fn submit_frame(ctx: &WorkerContext, request: AnalyzeFrameRequest) {
    match ctx.analyzer.analyze(&request).await {
        Ok(update) => {
            let snapshot = ctx.behavior.lock().await.apply(update);
            ctx.publish(MonitorEvent::BehaviorUpdated(snapshot));
        }
        Err(BehaviorError::NotConfigured) => {
            log_debug!("behavior analyzer not configured; cycle skipped");
        }
        Err(err) => {
            log_warn!("behavior analysis failed, keeping previous snapshot: {err}");
        }
    }
}

/// Folds environment signals into the ledger until cancelled or the port closes.
pub(crate) async fn environment_loop(
    ctx: WorkerContext,
    mut events: mpsc::UnboundedReceiver<EnvironmentEvent>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    log_debug!("environment stream closed");
                    break;
                };
                if let Some(finding) = classify(&event) {
                    ctx.engine.lock().await.apply_finding(finding);
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("environment monitor shutting down");
                break;
            }
        }
    }
}

/// Running worker tasks for one session.
pub(crate) struct Workers {
    cancel_token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Workers {
    pub fn spawn(ctx: &WorkerContext, environment: mpsc::UnboundedReceiver<EnvironmentEvent>) -> Self {
        let cancel_token = CancellationToken::new();
        let handles = vec![
            tokio::spawn(analysis_loop(ctx.clone(), cancel_token.clone())),
            tokio::spawn(emission_loop(ctx.clone(), cancel_token.clone())),
            tokio::spawn(behavior_loop(ctx.clone(), cancel_token.clone())),
            tokio::spawn(environment_loop(
                ctx.clone(),
                environment,
                cancel_token.clone(),
            )),
        ];
        Self {
            cancel_token,
            handles,
        }
    }

    pub async fn shutdown(self) {
        self.cancel_token.cancel();
        for handle in self.handles {
            if let Err(err) = handle.await {
                log_error!("session worker failed to join: {err}");
            }
        }
    }
}
