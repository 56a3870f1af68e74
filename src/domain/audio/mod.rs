//! Audio value objects: stream format, wire codec, durations

pub mod codec;
pub mod duration;
pub mod format;

pub use duration::Duration;
pub use format::{StreamFormat, BUFFER_SAMPLES, BYTES_PER_SAMPLE, CHANNELS, SAMPLE_RATE};
