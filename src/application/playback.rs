//! Playback pipeline: sample source -> fixed-size buffer -> output device

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::audio::BUFFER_SAMPLES;

use super::ports::{PlaybackDevice, PlaybackDeviceError, SampleSource, StorageError};
use super::transport::TransportEvent;

/// Why a playback loop exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// The source ran out of samples
    EndOfStream,
    /// The stop flag was observed
    Stopped,
}

/// Errors from the playback pipeline
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Playback device error: {0}")]
    Device(#[from] PlaybackDeviceError),

    #[error("Failed to read audio source: {0}")]
    Source(#[from] StorageError),

    #[error("Failed to spawn playback worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Playback worker panicked")]
    WorkerPanicked,

    #[error("Playback worker exited before reporting readiness")]
    NotReady,
}

/// Run the playback loop until end-of-stream or `stop` is observed.
///
/// Device playback starts before the first read. Each iteration reads up
/// to [`BUFFER_SAMPLES`] samples; a final partial buffer is delivered with
/// exactly the count read, never padded. An empty source exits without a
/// single device write. Natural end drains the device queue so the tail is
/// heard; an explicit stop halts immediately.
pub fn run_playback_loop<D, S>(
    device: &mut D,
    source: &mut S,
    stop: &AtomicBool,
) -> Result<PlaybackEnd, PlaybackError>
where
    D: PlaybackDevice,
    S: SampleSource,
{
    let mut buf = [0i16; BUFFER_SAMPLES];

    device.play()?;

    let result: Result<PlaybackEnd, PlaybackError> = (|| {
        loop {
            if stop.load(Ordering::SeqCst) {
                return Ok(PlaybackEnd::Stopped);
            }
            let n = source.read_samples(&mut buf)?;
            if n == 0 {
                return Ok(PlaybackEnd::EndOfStream);
            }
            let mut written = 0;
            while written < n {
                written += device.write(&buf[written..n])?;
            }
        }
    })();

    if matches!(result, Ok(PlaybackEnd::EndOfStream)) {
        device.drain()?;
    }
    let halted = device.stop();

    let end = result?;
    halted?;
    Ok(end)
}

/// An active playback pipeline: one worker thread plus its stop flag.
pub struct PlaybackSession {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<PlaybackEnd, PlaybackError>>>,
}

impl PlaybackSession {
    /// Spawn the playback worker.
    ///
    /// The device is constructed inside the worker (audio stream handles
    /// are not `Send`), with open failures reported back before this
    /// function returns. `events` receives
    /// [`TransportEvent::PlaybackEnded`] when the loop exits for any
    /// reason; that is the cue for the controlling context to reap the
    /// session.
    pub fn spawn<D, S, F>(
        open_device: F,
        mut source: S,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<Self, PlaybackError>
    where
        D: PlaybackDevice + 'static,
        S: SampleSource + Send + 'static,
        F: FnOnce() -> Result<D, PlaybackDeviceError> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), PlaybackDeviceError>>();

        let worker = thread::Builder::new()
            .name("audio-playback".to_string())
            .spawn(move || {
                let mut device = match open_device() {
                    Ok(device) => {
                        let _ = ready_tx.send(Ok(()));
                        device
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.clone()));
                        return Err(PlaybackError::Device(e));
                    }
                };

                let result = run_playback_loop(&mut device, &mut source, &stop_flag);
                let _ = events.send(TransportEvent::PlaybackEnded);
                result
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                stop,
                worker: Some(worker),
            }),
            Ok(Err(device_err)) => {
                let _ = worker.join();
                Err(PlaybackError::Device(device_err))
            }
            Err(_) => {
                let _ = worker.join();
                Err(PlaybackError::NotReady)
            }
        }
    }

    /// Whether the worker has exited its loop.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Request stop and wait for the worker to exit.
    ///
    /// On a session that already ended naturally this just joins and
    /// returns [`PlaybackEnd::EndOfStream`].
    pub fn stop(mut self) -> Result<PlaybackEnd, PlaybackError> {
        self.stop.store(true, Ordering::SeqCst);
        match self.worker.take() {
            Some(handle) => handle.join().map_err(|_| PlaybackError::WorkerPanicked)?,
            None => Err(PlaybackError::WorkerPanicked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct VecSource {
        samples: Vec<i16>,
        pos: usize,
    }

    impl VecSource {
        fn new(samples: Vec<i16>) -> Self {
            Self { samples, pos: 0 }
        }
    }

    impl SampleSource for VecSource {
        fn read_samples(&mut self, buf: &mut [i16]) -> Result<usize, StorageError> {
            let remaining = &self.samples[self.pos..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[derive(Default)]
    struct RecordingDevice {
        written: Vec<i16>,
        writes: usize,
        playing: bool,
        played_before_first_write: bool,
        drained: bool,
        stopped: bool,
    }

    impl PlaybackDevice for RecordingDevice {
        fn play(&mut self) -> Result<(), PlaybackDeviceError> {
            self.playing = true;
            if self.writes == 0 {
                self.played_before_first_write = true;
            }
            Ok(())
        }

        fn write(&mut self, samples: &[i16]) -> Result<usize, PlaybackDeviceError> {
            assert!(self.playing, "write before play");
            self.writes += 1;
            self.written.extend_from_slice(samples);
            Ok(samples.len())
        }

        fn drain(&mut self) -> Result<(), PlaybackDeviceError> {
            self.drained = true;
            Ok(())
        }

        fn stop(&mut self) -> Result<(), PlaybackDeviceError> {
            self.stopped = true;
            Ok(())
        }
    }

    /// Accepts at most `cap` samples per write, exercising partial writes.
    struct TricklingDevice {
        inner: RecordingDevice,
        cap: usize,
    }

    impl PlaybackDevice for TricklingDevice {
        fn play(&mut self) -> Result<(), PlaybackDeviceError> {
            self.inner.play()
        }

        fn write(&mut self, samples: &[i16]) -> Result<usize, PlaybackDeviceError> {
            let n = self.cap.min(samples.len());
            self.inner.write(&samples[..n])
        }

        fn drain(&mut self) -> Result<(), PlaybackDeviceError> {
            self.inner.drain()
        }

        fn stop(&mut self) -> Result<(), PlaybackDeviceError> {
            self.inner.stop()
        }
    }

    #[test]
    fn plays_partial_final_buffer_exactly() {
        // 1030 samples: one full buffer plus a 6-sample tail.
        let samples: Vec<i16> = (0..1030).map(|i| i as i16).collect();
        let mut device = RecordingDevice::default();
        let mut source = VecSource::new(samples.clone());
        let stop = AtomicBool::new(false);

        let end = run_playback_loop(&mut device, &mut source, &stop).unwrap();
        assert_eq!(end, PlaybackEnd::EndOfStream);
        assert_eq!(device.written, samples);
        assert_eq!(device.writes, 2);
        assert!(device.drained);
        assert!(device.stopped);
    }

    #[test]
    fn empty_source_never_touches_the_device_queue() {
        let mut device = RecordingDevice::default();
        let mut source = VecSource::new(Vec::new());
        let stop = AtomicBool::new(false);

        let end = run_playback_loop(&mut device, &mut source, &stop).unwrap();
        assert_eq!(end, PlaybackEnd::EndOfStream);
        assert_eq!(device.writes, 0);
        assert!(device.played_before_first_write);
    }

    #[test]
    fn short_device_writes_are_retried_with_offsets() {
        let samples: Vec<i16> = (0..100).map(|i| i as i16).collect();
        let mut device = TricklingDevice {
            inner: RecordingDevice::default(),
            cap: 7,
        };
        let mut source = VecSource::new(samples.clone());
        let stop = AtomicBool::new(false);

        run_playback_loop(&mut device, &mut source, &stop).unwrap();
        assert_eq!(device.inner.written, samples);
    }

    #[test]
    fn stop_flag_exits_without_drain() {
        let samples: Vec<i16> = vec![0; 4096];
        let mut device = RecordingDevice::default();
        let mut source = VecSource::new(samples);
        let stop = AtomicBool::new(true);

        let end = run_playback_loop(&mut device, &mut source, &stop).unwrap();
        assert_eq!(end, PlaybackEnd::Stopped);
        assert_eq!(device.writes, 0);
        assert!(!device.drained);
        assert!(device.stopped);
    }

    #[test]
    fn session_reports_end_of_stream_and_event() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let written = Arc::new(Mutex::new(Vec::new()));

        struct SharedDevice {
            written: Arc<Mutex<Vec<i16>>>,
            playing: bool,
        }

        impl PlaybackDevice for SharedDevice {
            fn play(&mut self) -> Result<(), PlaybackDeviceError> {
                self.playing = true;
                Ok(())
            }

            fn write(&mut self, samples: &[i16]) -> Result<usize, PlaybackDeviceError> {
                self.written.lock().unwrap().extend_from_slice(samples);
                Ok(samples.len())
            }

            fn drain(&mut self) -> Result<(), PlaybackDeviceError> {
                Ok(())
            }

            fn stop(&mut self) -> Result<(), PlaybackDeviceError> {
                Ok(())
            }
        }

        let device_written = Arc::clone(&written);
        let session = PlaybackSession::spawn(
            move || {
                Ok(SharedDevice {
                    written: device_written,
                    playing: false,
                })
            },
            VecSource::new(vec![5, 6, 7]),
            tx,
        )
        .unwrap();

        // The worker ends on its own; the event is the reap cue.
        while !session.is_finished() {
            thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(rx.try_recv().unwrap(), TransportEvent::PlaybackEnded);
        assert_eq!(session.stop().unwrap(), PlaybackEnd::EndOfStream);
        assert_eq!(*written.lock().unwrap(), vec![5, 6, 7]);
    }
}
