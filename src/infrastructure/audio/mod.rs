//! Audio device adapters

pub mod cpal_capture;
pub mod rodio_playback;

pub use cpal_capture::CpalCapture;
pub use rodio_playback::RodioPlayback;
