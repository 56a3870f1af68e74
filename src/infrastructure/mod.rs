//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: audio
//! devices, file storage, and configuration.

pub mod audio;
pub mod config;
pub mod storage;

// Re-export adapters
pub use audio::{CpalCapture, RodioPlayback};
pub use config::XdgConfigStore;
pub use storage::{default_capture_path, open_sink, open_source, RawPcmSink, RawPcmSource};
