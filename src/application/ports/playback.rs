//! Playback device port interface

use thiserror::Error;

/// Playback device errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackDeviceError {
    #[error("No audio output device available")]
    NoOutputDevice,

    #[error("Failed to open output stream: {0}")]
    OpenFailed(String),

    #[error("Failed to write to output device: {0}")]
    WriteFailed(String),
}

/// Port for a speaker-like device consuming 16-bit mono samples.
///
/// Like [`super::capture::CaptureDevice`], handles are owned by their
/// worker and the port is synchronous.
pub trait PlaybackDevice {
    /// Start device playback. Must be called before the first write.
    fn play(&mut self) -> Result<(), PlaybackDeviceError>;

    /// Queue `samples` for playback.
    ///
    /// Returns the number of samples accepted. Blocks while the device
    /// queue is full; each pipeline has exactly one thread, so blocking
    /// here is the intended flow control.
    fn write(&mut self, samples: &[i16]) -> Result<usize, PlaybackDeviceError>;

    /// Block until everything queued has been played out.
    fn drain(&mut self) -> Result<(), PlaybackDeviceError>;

    /// Halt playback immediately, discarding anything still queued.
    fn stop(&mut self) -> Result<(), PlaybackDeviceError>;
}
