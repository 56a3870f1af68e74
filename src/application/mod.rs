//! Application layer - Use cases and port interfaces
//!
//! Contains the capture and playback pipelines, the transport coordinator,
//! and trait definitions for external system interactions.

pub mod capture;
pub mod playback;
pub mod ports;
pub mod transport;

// Re-export use cases
pub use capture::{run_capture_loop, CaptureError, CaptureSession};
pub use playback::{run_playback_loop, PlaybackEnd, PlaybackError, PlaybackSession};
pub use transport::{Controls, Transport, TransportError, TransportEvent};
