use anyhow::{bail, Result};

use super::frame::{FrameArena, VideoFrame};
use super::source::{ReadyState, VideoSource};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "interview_guard::capture";

use crate::{log_debug, log_info, log_warn};

/// Current frame plus the one before it, borrowed from the sampler's arena.
pub struct CapturedFrames<'a> {
    pub current: &'a VideoFrame,
    pub previous: Option<&'a VideoFrame>,
}

/// Pulls stills from the host's video source into a two-slot arena.
///
/// Owns the capture surface for the lifetime of one session: acquired by
/// `initialize`, dropped by `release`.
pub struct FrameSampler {
    source: Option<Box<dyn VideoSource>>,
    arena: FrameArena,
    min_ready_state: ReadyState,
}

impl FrameSampler {
    pub fn new(min_ready_state: ReadyState) -> Self {
        Self {
            source: None,
            arena: FrameArena::new(),
            min_ready_state,
        }
    }

    pub fn initialize(&mut self, source: Box<dyn VideoSource>) -> Result<()> {
        if self.source.is_some() {
            bail!("capture surface already acquired");
        }

        let (width, height) = source.dimensions();
        self.arena.clear();
        self.arena.next_slot(width, height);
        self.source = Some(source);

        log_info!("capture surface acquired at {}x{}", width, height);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.source.is_some()
    }

    /// Draw the source into the arena and return it with the previous frame.
    ///
    /// Returns `None` (after logging) when the source is missing, not ready, or
    /// fails to render; the previous frame is left untouched in that case.
    pub fn capture_frame(&mut self) -> Option<CapturedFrames<'_>> {
        let source = self.source.as_mut()?;

        let ready = source.ready_state();
        if ready < self.min_ready_state {
            log_debug!("video source not ready ({:?}), skipping capture", ready);
            return None;
        }

        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            log_warn!("video source reports empty dimensions, skipping capture");
            return None;
        }

        let slot = self.arena.next_slot(width, height);
        if let Err(err) = source.draw(&mut slot.data) {
            log_warn!("frame draw failed: {err:#}");
            return None;
        }
        self.arena.commit();

        let current = self.arena.current()?;
        Some(CapturedFrames {
            current,
            previous: self.arena.previous(),
        })
    }

    /// Copy of the frame the last analysis cycle saw. Never draws from the
    /// source, so the replay position and the motion pair stay untouched.
    pub fn current_copy(&self) -> Option<VideoFrame> {
        self.source.as_ref()?;
        self.arena.current().cloned()
    }

    pub fn release(&mut self) {
        if self.source.take().is_some() {
            log_info!("capture surface released");
        }
        self.arena.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct StubSource {
        ready: ReadyState,
        fill: u8,
        fail: bool,
    }

    impl VideoSource for StubSource {
        fn ready_state(&self) -> ReadyState {
            self.ready
        }

        fn dimensions(&self) -> (u32, u32) {
            (4, 4)
        }

        fn draw(&mut self, target: &mut [u8]) -> Result<()> {
            if self.fail {
                return Err(anyhow!("decoder hiccup"));
            }
            target.fill(self.fill);
            self.fill = self.fill.wrapping_add(1);
            Ok(())
        }
    }

    fn sampler_with(ready: ReadyState, fail: bool) -> FrameSampler {
        let mut sampler = FrameSampler::new(ReadyState::HaveCurrentData);
        sampler
            .initialize(Box::new(StubSource {
                ready,
                fill: 0,
                fail,
            }))
            .unwrap();
        sampler
    }

    #[test]
    fn test_capture_before_initialize_is_none() {
        let mut sampler = FrameSampler::new(ReadyState::HaveCurrentData);
        assert!(sampler.capture_frame().is_none());
    }

    #[test]
    fn test_not_ready_source_is_skipped() {
        let mut sampler = sampler_with(ReadyState::HaveMetadata, false);
        assert!(sampler.capture_frame().is_none());
    }

    #[test]
    fn test_consecutive_captures_expose_previous() {
        let mut sampler = sampler_with(ReadyState::HaveEnoughData, false);

        let first = sampler.capture_frame().unwrap();
        assert!(first.previous.is_none());
        assert_eq!(first.current.data[0], 0);

        let second = sampler.capture_frame().unwrap();
        assert_eq!(second.current.data[0], 1);
        assert_eq!(second.previous.unwrap().data[0], 0);
    }

    #[test]
    fn test_failed_draw_is_skipped() {
        let mut sampler = sampler_with(ReadyState::HaveEnoughData, true);
        assert!(sampler.capture_frame().is_none());
        assert!(sampler.current_copy().is_none());
    }

    #[test]
    fn test_current_copy_does_not_draw() {
        let mut sampler = sampler_with(ReadyState::HaveEnoughData, false);
        assert!(sampler.current_copy().is_none());

        sampler.capture_frame().unwrap();
        let copy = sampler.current_copy().unwrap();
        assert_eq!(copy.data[0], 0);
        assert_eq!(sampler.current_copy().unwrap().data[0], 0);

        let next = sampler.capture_frame().unwrap();
        assert_eq!(next.current.data[0], 1);
        assert_eq!(next.previous.unwrap().data[0], 0);
    }

    #[test]
    fn test_current_copy_is_gone_after_release() {
        let mut sampler = sampler_with(ReadyState::HaveEnoughData, false);
        sampler.capture_frame().unwrap();
        sampler.release();
        assert!(sampler.current_copy().is_none());
    }

    #[test]
    fn test_double_initialize_is_rejected_until_release() {
        let mut sampler = sampler_with(ReadyState::HaveEnoughData, false);
        let again = sampler.initialize(Box::new(StubSource {
            ready: ReadyState::HaveEnoughData,
            fill: 0,
            fail: false,
        }));
        assert!(again.is_err());

        sampler.release();
        assert!(!sampler.is_initialized());
        assert!(sampler.capture_frame().is_none());
    }
}
