pub mod audio;
pub mod encode;
pub mod frame;
pub mod sampler;
pub mod source;

pub use audio::{AudioLevelProbe, FixedAudioProbe, SimulatedAudioProbe};
pub use encode::encode_data_uri;
pub use frame::{FrameArena, VideoFrame};
pub use sampler::{CapturedFrames, FrameSampler};
pub use source::{ImageSequenceSource, ReadyState, VideoSource};
