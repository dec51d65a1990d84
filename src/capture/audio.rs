use rand::Rng;

/// Source of a 0-100 input loudness reading, sampled once per analysis cycle.
pub trait AudioLevelProbe: Send {
    fn sample(&mut self) -> f32;
}

/// Stand-in probe for hosts that don't wire a real microphone meter.
#[derive(Debug, Default)]
pub struct SimulatedAudioProbe;

impl AudioLevelProbe for SimulatedAudioProbe {
    fn sample(&mut self) -> f32 {
        rand::thread_rng().gen_range(0.0..100.0)
    }
}

/// Probe that always reports the same level.
#[derive(Debug, Clone, Copy)]
pub struct FixedAudioProbe(pub f32);

impl AudioLevelProbe for FixedAudioProbe {
    fn sample(&mut self) -> f32 {
        self.0.clamp(0.0, 100.0)
    }
}
