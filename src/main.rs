use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use tokio::sync::broadcast::error::RecvError;

use interview_guard_lib::{
    init_logging, log_info, log_warn, DetachedEnvironment, ImageSequenceSource, MonitorEvent,
    SessionController, SettingsStore,
};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::replay";

const DEFAULT_SECONDS: u64 = 30;
const SETTINGS_FILE: &str = "interview-guard.json";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(frames_dir) = args.next().map(PathBuf::from) else {
        bail!("usage: interview-guard <frames-dir> [seconds]");
    };
    let seconds = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid duration in seconds: {raw}"))?,
        None => DEFAULT_SECONDS,
    };

    let store = SettingsStore::new(PathBuf::from(SETTINGS_FILE))?;
    let settings = store.current();
    init_logging(settings.debug);

    let source = ImageSequenceSource::from_dir(&frames_dir)?;
    log_info!(
        "replaying {} frames from {} for {seconds}s",
        source.len(),
        frames_dir.display()
    );

    let controller = SessionController::from_settings(&settings, Arc::new(DetachedEnvironment))?;
    let mut events = controller.start(Box::new(source)).await?;

    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(MonitorEvent::IntegrityUpdated(snapshot)) => log_info!(
                    "integrity: score={} status={:?} violations={}",
                    snapshot.integrity_score, snapshot.status, snapshot.violations_count
                ),
                Ok(MonitorEvent::BehaviorUpdated(snapshot)) => log_info!(
                    "behavior: attention={} engagement={} state={}",
                    snapshot.attention_score, snapshot.engagement_level, snapshot.emotional_state
                ),
                Ok(MonitorEvent::StatusChanged(status)) => log_info!("status: {status:?}"),
                Err(RecvError::Lagged(skipped)) => log_warn!("event logger lagged by {skipped}"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
        _ = tokio::signal::ctrl_c() => log_info!("interrupted, stopping early"),
    }

    let report = controller.stop().await?;
    logger.abort();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
