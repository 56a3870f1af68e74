//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod playback;
pub mod storage;

// Re-export common types
pub use capture::{CaptureDevice, CaptureDeviceError};
pub use config::ConfigStore;
pub use playback::{PlaybackDevice, PlaybackDeviceError};
pub use storage::{SampleSink, SampleSource, StorageError};
