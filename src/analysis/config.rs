use serde::{Deserialize, Serialize};

/// Tunable thresholds for the on-device frame heuristics.
///
/// None of these values has a documented calibration; treat them as knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HeuristicConfig {
    /// Grid spacing, in pixels, of the skin samples taken around the frame centre.
    pub face_sample_stride: u32,

    /// Radius of the sampled disc as a fraction of `min(width, height)`.
    pub face_radius_ratio: f64,

    /// A face is present when strictly more skin samples than this are found.
    pub min_skin_samples: u32,

    /// "No face" fires once consecutive absences exceed this count.
    pub absence_threshold: u32,

    /// Every n-th pixel takes part in the motion comparison.
    pub motion_pixel_stride: usize,

    /// Mean summed RGB delta per sample above which motion is excessive.
    pub motion_threshold: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            face_sample_stride: 10,
            face_radius_ratio: 0.15,
            min_skin_samples: 20,
            absence_threshold: 3,
            motion_pixel_stride: 100,
            motion_threshold: 50.0,
        }
    }
}
