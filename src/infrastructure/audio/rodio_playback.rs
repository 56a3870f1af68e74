//! Audio playback via rodio
//!
//! Queues each sample buffer on a rodio sink. The sink handles the device
//! stream; writes block once a few buffers are queued so the playback loop
//! stays in step with real time instead of swallowing the whole file.

use std::thread;
use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};

use crate::application::ports::{PlaybackDevice, PlaybackDeviceError};
use crate::domain::audio::StreamFormat;

/// Writes block while this many buffers are already queued
const MAX_QUEUED_BUFFERS: usize = 4;

/// Poll interval while the device queue is full
const QUEUE_POLL: Duration = Duration::from_millis(5);

/// Speaker adapter consuming 16-bit mono samples.
///
/// The handle is built and used on the playback worker; the underlying
/// output stream is not `Send`.
pub struct RodioPlayback {
    _stream: OutputStream,
    sink: Sink,
    format: StreamFormat,
}

impl RodioPlayback {
    /// Open the default output device, paused until `play`.
    pub fn open(format: StreamFormat) -> Result<Self, PlaybackDeviceError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| PlaybackDeviceError::OpenFailed(e.to_string()))?;
        let sink =
            Sink::try_new(&handle).map_err(|e| PlaybackDeviceError::OpenFailed(e.to_string()))?;
        sink.pause();

        Ok(Self {
            _stream: stream,
            sink,
            format,
        })
    }
}

impl PlaybackDevice for RodioPlayback {
    fn play(&mut self) -> Result<(), PlaybackDeviceError> {
        self.sink.play();
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) -> Result<usize, PlaybackDeviceError> {
        // Each pipeline has exactly one thread; blocking on a full queue
        // is the flow control.
        while self.sink.len() > MAX_QUEUED_BUFFERS {
            thread::sleep(QUEUE_POLL);
        }

        self.sink.append(SamplesBuffer::new(
            self.format.channels,
            self.format.sample_rate,
            samples.to_vec(),
        ));
        Ok(samples.len())
    }

    fn drain(&mut self) -> Result<(), PlaybackDeviceError> {
        self.sink.sleep_until_end();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlaybackDeviceError> {
        self.sink.stop();
        Ok(())
    }
}
