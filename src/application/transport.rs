//! Transport coordinator owning both audio pipelines
//!
//! One capture slot, one playback slot, mutual exclusion between them, and
//! an event channel delivering worker exits on the consumer's own executor.

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::transport::{InvalidStateTransition, PipelineSession, PipelineState};

use super::capture::{CaptureError, CaptureSession};
use super::playback::{PlaybackEnd, PlaybackError, PlaybackSession};
use super::ports::{CaptureDevice, CaptureDeviceError, PlaybackDevice, PlaybackDeviceError};
use super::ports::{SampleSink, SampleSource};

/// Asynchronous notifications from the pipeline workers.
///
/// Sent from the worker thread, consumed on the controlling context's own
/// executor. The payloadless events are reap cues: call the matching
/// `stop_*`/`finish_*` to join the worker and collect its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// The capture worker exited its loop (stop request or failure)
    RecordingEnded,
    /// The playback worker exited its loop (end-of-stream, stop, or failure)
    PlaybackEnded,
}

/// Which pipelines may currently start (the opposite-control
/// enable/disable signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub can_record: bool,
    pub can_play: bool,
}

/// Errors from transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Recording failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),
}

/// The two-pipeline transport.
///
/// Capture and playback are mutually exclusive; while either runs the
/// other cannot start. Stopping an idle pipeline is a no-op. All stops
/// join the worker before the slot is cleared, so a restart can never
/// race a device teardown.
pub struct Transport {
    record_state: PipelineSession,
    play_state: PipelineSession,
    capture: Option<CaptureSession>,
    playback: Option<PlaybackSession>,
    events: UnboundedSender<TransportEvent>,
}

impl Transport {
    /// Create an idle transport delivering worker events to `events`
    pub fn new(events: UnboundedSender<TransportEvent>) -> Self {
        Self {
            record_state: PipelineSession::new(),
            play_state: PipelineSession::new(),
            capture: None,
            playback: None,
            events,
        }
    }

    /// Current pipeline states, for status display
    pub fn states(&self) -> (PipelineState, PipelineState) {
        (self.record_state.state(), self.play_state.state())
    }

    /// Which pipelines may start right now
    pub fn controls(&self) -> Controls {
        let both_idle = self.record_state.is_idle() && self.play_state.is_idle();
        Controls {
            can_record: both_idle,
            can_play: both_idle,
        }
    }

    /// Whether a capture pipeline is active
    pub fn is_recording(&self) -> bool {
        self.record_state.is_running()
    }

    /// Whether a playback pipeline is active
    pub fn is_playing(&self) -> bool {
        self.play_state.is_running()
    }

    /// Start the capture pipeline.
    ///
    /// Fails when capture is already active (no RUNNING -> RUNNING) or
    /// while playback holds the transport.
    pub fn start_recording<D, S, F>(&mut self, open_device: F, sink: S) -> Result<(), TransportError>
    where
        D: CaptureDevice + 'static,
        S: SampleSink + Send + 'static,
        F: FnOnce() -> Result<D, CaptureDeviceError> + Send + 'static,
    {
        if !self.record_state.is_idle() {
            return Err(InvalidStateTransition {
                current_state: self.record_state.state(),
                action: "start recording",
            }
            .into());
        }
        if !self.play_state.is_idle() {
            return Err(InvalidStateTransition {
                current_state: self.play_state.state(),
                action: "start recording while playback is active",
            }
            .into());
        }

        let session = CaptureSession::spawn(open_device, sink, self.events.clone())?;
        self.record_state.start()?;
        self.capture = Some(session);
        Ok(())
    }

    /// Stop the capture pipeline and wait for its worker to exit.
    ///
    /// Returns the total samples captured, or `None` when nothing was
    /// recording (a stop without a start is a no-op).
    pub fn stop_recording(&mut self) -> Result<Option<u64>, TransportError> {
        let Some(session) = self.capture.take() else {
            return Ok(None);
        };

        self.record_state.request_stop()?;
        let result = session.stop();
        self.record_state.finish()?;
        Ok(Some(result?))
    }

    /// Start the playback pipeline.
    pub fn start_playback<D, S, F>(&mut self, open_device: F, source: S) -> Result<(), TransportError>
    where
        D: PlaybackDevice + 'static,
        S: SampleSource + Send + 'static,
        F: FnOnce() -> Result<D, PlaybackDeviceError> + Send + 'static,
    {
        if !self.play_state.is_idle() {
            return Err(InvalidStateTransition {
                current_state: self.play_state.state(),
                action: "start playback",
            }
            .into());
        }
        if !self.record_state.is_idle() {
            return Err(InvalidStateTransition {
                current_state: self.record_state.state(),
                action: "start playback while recording is active",
            }
            .into());
        }

        let session = PlaybackSession::spawn(open_device, source, self.events.clone())?;
        self.play_state.start()?;
        self.playback = Some(session);
        Ok(())
    }

    /// Stop the playback pipeline and wait for its worker to exit.
    ///
    /// Returns how playback ended, or `None` when nothing was playing.
    pub fn stop_playback(&mut self) -> Result<Option<PlaybackEnd>, TransportError> {
        let Some(session) = self.playback.take() else {
            return Ok(None);
        };

        self.play_state.request_stop()?;
        let result = session.stop();
        self.play_state.finish()?;
        Ok(Some(result?))
    }

    /// Reap a playback session after [`TransportEvent::PlaybackEnded`].
    ///
    /// The worker has already exited; this joins it, releases the slot,
    /// and reports how playback ended.
    pub fn finish_playback(&mut self) -> Result<Option<PlaybackEnd>, TransportError> {
        self.stop_playback()
    }
}
