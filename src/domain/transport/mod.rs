//! Transport domain: pipeline session lifecycle

pub mod session;

pub use session::{InvalidStateTransition, PipelineSession, PipelineState};
