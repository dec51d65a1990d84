use std::path::Path;

use anyhow::{bail, Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::capture";

use crate::log_warn;

/// How much media the source has buffered, in increasing order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// A live video handle supplied by the host. The engine never opens a camera itself.
pub trait VideoSource: Send {
    fn ready_state(&self) -> ReadyState;

    /// Native pixel dimensions; `(0, 0)` while unknown.
    fn dimensions(&self) -> (u32, u32);

    /// Render the current picture as RGBA into `target`, which is exactly
    /// `width * height * 4` bytes for the current `dimensions()`.
    fn draw(&mut self, target: &mut [u8]) -> Result<()>;
}

/// Replays a fixed list of still images in a loop, one per `draw`.
pub struct ImageSequenceSource {
    frames: Vec<RgbaImage>,
    cursor: usize,
}

impl ImageSequenceSource {
    pub fn new(frames: Vec<RgbaImage>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Load every decodable image in `dir`, ordered by file name.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list frames in {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect::<Vec<_>>();
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            match image::open(&path) {
                Ok(img) => frames.push(img.to_rgba8()),
                Err(err) => log_warn!("skipping {}: {err}", path.display()),
            }
        }

        if frames.is_empty() {
            bail!("no decodable frames found in {}", dir.display());
        }

        Ok(Self::new(frames))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn current(&self) -> Option<&RgbaImage> {
        self.frames.get(self.cursor)
    }
}

impl VideoSource for ImageSequenceSource {
    fn ready_state(&self) -> ReadyState {
        if self.frames.is_empty() {
            ReadyState::HaveNothing
        } else {
            ReadyState::HaveEnoughData
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        self.current().map(|img| img.dimensions()).unwrap_or((0, 0))
    }

    fn draw(&mut self, target: &mut [u8]) -> Result<()> {
        let Some(img) = self.current() else {
            bail!("image sequence is empty");
        };
        let raw = img.as_raw();
        if raw.len() != target.len() {
            bail!(
                "target buffer is {} bytes, frame needs {}",
                target.len(),
                raw.len()
            );
        }
        target.copy_from_slice(raw);
        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(())
    }
}
