use crate::capture::VideoFrame;

use super::config::HeuristicConfig;

/// Result of the skin-sample face check on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacePresence {
    pub detected: bool,
    pub skin_samples: u32,
}

/// Skin-tone rule on a single RGB triple.
pub fn is_skin_color(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    r > 95 && g > 40 && b > 20 && r > g && r > b && (r - g) > 15
}

/// Count skin-coloured grid samples inside a disc centred on the frame.
///
/// The disc radius is `face_radius_ratio * min(width, height)`; samples sit on a
/// grid of `face_sample_stride` pixels anchored at the disc's top-left corner.
pub fn detect_face(frame: &VideoFrame, config: &HeuristicConfig) -> FacePresence {
    if frame.is_empty() {
        return FacePresence {
            detected: false,
            skin_samples: 0,
        };
    }

    let cx = (frame.width / 2) as i64;
    let cy = (frame.height / 2) as i64;
    let radius = (frame.width.min(frame.height) as f64 * config.face_radius_ratio).floor() as i64;
    let stride = config.face_sample_stride.max(1) as usize;
    let radius_sq = radius * radius;

    let mut skin_samples = 0u32;
    for y in (cy - radius..cy + radius).step_by(stride) {
        for x in (cx - radius..cx + radius).step_by(stride) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > radius_sq || x < 0 || y < 0 {
                continue;
            }
            if let Some((r, g, b)) = frame.rgb_at(x as u32, y as u32) {
                if is_skin_color(r, g, b) {
                    skin_samples += 1;
                }
            }
        }
    }

    FacePresence {
        detected: skin_samples > config.min_skin_samples,
        skin_samples,
    }
}

/// Counts consecutive frames without a face.
#[derive(Debug, Clone, Default)]
pub struct AbsenceTracker {
    consecutive: u32,
}

impl AbsenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one observation; returns true when the absence run now exceeds
    /// `threshold`. Every further absent frame keeps returning true.
    pub fn observe(&mut self, detected: bool, threshold: u32) -> bool {
        if detected {
            self.consecutive = 0;
            false
        } else {
            self.consecutive = self.consecutive.saturating_add(1);
            self.consecutive > threshold
        }
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
    }
}
