//! QuickTape - command-line voice recorder
//!
//! This crate records microphone audio to a file as a raw 16-bit PCM
//! stream and plays it back, with the on-disk container exposed as
//! configuration.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects (stream format, wire codec, durations),
//!   the pipeline state machine, and domain errors
//! - **Application**: The capture and playback loops, the transport
//!   coordinator, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, file
//!   storage, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
