use crate::capture::VideoFrame;

use super::config::HeuristicConfig;

/// Mean summed |ΔR|+|ΔG|+|ΔB| over every `motion_pixel_stride`-th pixel.
///
/// `None` when there is nothing to compare: no previous frame, a size
/// mismatch, or an empty buffer.
pub fn motion_magnitude(
    current: &VideoFrame,
    previous: Option<&VideoFrame>,
    config: &HeuristicConfig,
) -> Option<f64> {
    let previous = previous?;
    if current.data.len() != previous.data.len() || current.data.is_empty() {
        return None;
    }

    let step = config.motion_pixel_stride.max(1) * 4;
    let mut total: u64 = 0;
    let mut samples: u64 = 0;

    for i in (0..current.data.len()).step_by(step) {
        let (Some(cur), Some(prev)) = (current.data.get(i..i + 3), previous.data.get(i..i + 3))
        else {
            break;
        };
        total += cur
            .iter()
            .zip(prev)
            .map(|(a, b)| a.abs_diff(*b) as u64)
            .sum::<u64>();
        samples += 1;
    }

    (samples > 0).then(|| total as f64 / samples as f64)
}
