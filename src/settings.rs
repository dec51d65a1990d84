use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::HeuristicConfig;
use crate::capture::ReadyState;
use crate::integrity::ScoringConfig;

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::settings";

use crate::log_warn;

pub const ENV_ANALYZER_URL: &str = "INTERVIEW_GUARD_ANALYZER_URL";
pub const ENV_ANALYZER_TOKEN: &str = "INTERVIEW_GUARD_ANALYZER_TOKEN";
pub const ENV_DEBUG: &str = "INTERVIEW_GUARD_DEBUG";

/// Timer periods, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CadenceSettings {
    pub analysis_every_ms: u64,
    pub emit_every_ms: u64,
    pub emit_bootstrap_ms: u64,
    pub behavior_every_ms: u64,
    pub behavior_bootstrap_ms: u64,
}

impl Default for CadenceSettings {
    fn default() -> Self {
        Self {
            analysis_every_ms: 2_000,
            emit_every_ms: 5_000,
            emit_bootstrap_ms: 500,
            behavior_every_ms: 5_000,
            behavior_bootstrap_ms: 1_000,
        }
    }
}

impl CadenceSettings {
    pub fn analysis_every(&self) -> Duration {
        Duration::from_millis(self.analysis_every_ms.max(1))
    }

    pub fn emit_every(&self) -> Duration {
        Duration::from_millis(self.emit_every_ms.max(1))
    }

    pub fn emit_bootstrap(&self) -> Duration {
        Duration::from_millis(self.emit_bootstrap_ms)
    }

    pub fn behavior_every(&self) -> Duration {
        Duration::from_millis(self.behavior_every_ms.max(1))
    }

    pub fn behavior_bootstrap(&self) -> Duration {
        Duration::from_millis(self.behavior_bootstrap_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureSettings {
    /// Sources below this state are skipped for the cycle.
    pub min_ready_state: ReadyState,
    pub jpeg_quality: u8,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            min_ready_state: ReadyState::HaveCurrentData,
            jpeg_quality: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerSettings {
    pub endpoint: Option<String>,
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            bearer_token: None,
            timeout_secs: 30,
        }
    }
}

impl AnalyzerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorSettings {
    pub heuristics: HeuristicConfig,
    pub scoring: ScoringConfig,
    pub cadence: CadenceSettings,
    pub capture: CaptureSettings,
    pub analyzer: AnalyzerSettings,
    pub debug: bool,
}

impl MonitorSettings {
    /// Layer the process environment over file/default values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_ANALYZER_URL).filter(|v| !v.trim().is_empty()) {
            self.analyzer.endpoint = Some(url);
        }
        if let Some(token) = lookup(ENV_ANALYZER_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.analyzer.bearer_token = Some(token);
        }
        if let Some(flag) = lookup(ENV_DEBUG) {
            self.debug = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        if self.debug {
            self.cadence.emit_every_ms = self.cadence.analysis_every_ms;
        }
    }
}

/// JSON-file backed settings with environment overrides applied on load.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<MonitorSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data: MonitorSettings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("ignoring unparsable settings {}: {err}", path.display());
                MonitorSettings::default()
            })
        } else {
            MonitorSettings::default()
        };
        data.apply_env_overrides();

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> MonitorSettings {
        self.data
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn update(&self, settings: MonitorSettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &MonitorSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
