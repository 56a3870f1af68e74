//! Capture device port interface

use thiserror::Error;

/// Capture device errors
#[derive(Debug, Clone, Error)]
pub enum CaptureDeviceError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Input device rejected the stream configuration: {0}")]
    UnsupportedConfig(String),

    #[error("Failed to open input stream: {0}")]
    OpenFailed(String),

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Input stream failed: {0}")]
    StreamFailed(String),
}

/// Port for a microphone-like device producing 16-bit mono samples.
///
/// Handles are exclusively owned by the capture worker while the pipeline
/// runs; dropping the handle releases the underlying stream. The port is
/// synchronous because it is driven from a dedicated blocking loop.
pub trait CaptureDevice {
    /// Begin producing samples.
    fn start(&mut self) -> Result<(), CaptureDeviceError>;

    /// Pull up to `buf.len()` samples into `buf`.
    ///
    /// Returns the number of samples actually delivered, which may be less
    /// than requested, or zero when no data arrived within the device's
    /// poll interval. Zero is not end-of-stream; capture devices have none.
    fn read(&mut self, buf: &mut [i16]) -> Result<usize, CaptureDeviceError>;

    /// Stop producing samples. The handle stays valid until dropped.
    fn stop(&mut self) -> Result<(), CaptureDeviceError>;
}
