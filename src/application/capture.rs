//! Capture pipeline: microphone device -> fixed-size buffer -> sample sink

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::audio::BUFFER_SAMPLES;

use super::ports::{CaptureDevice, CaptureDeviceError, SampleSink, StorageError};
use super::transport::TransportEvent;

/// Errors from the capture pipeline
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture device error: {0}")]
    Device(#[from] CaptureDeviceError),

    #[error("Failed to write captured audio: {0}")]
    Sink(#[from] StorageError),

    #[error("Failed to spawn capture worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Capture worker panicked")]
    WorkerPanicked,

    #[error("Capture worker exited before reporting readiness")]
    NotReady,
}

/// Run the capture loop until `stop` is observed.
///
/// Pulls up to [`BUFFER_SAMPLES`] samples per device read and appends
/// exactly the count actually delivered to the sink; short reads are never
/// zero-filled. Any device or sink failure terminates the loop. The device
/// is stopped and the sink flushed and closed exactly once on every exit
/// path.
///
/// Returns the total number of samples captured.
pub fn run_capture_loop<D, S>(
    device: &mut D,
    sink: &mut S,
    stop: &AtomicBool,
) -> Result<u64, CaptureError>
where
    D: CaptureDevice,
    S: SampleSink,
{
    let mut buf = [0i16; BUFFER_SAMPLES];
    let mut total = 0u64;

    device.start()?;

    let result: Result<(), CaptureError> = (|| {
        while !stop.load(Ordering::SeqCst) {
            let n = device.read(&mut buf)?;
            if n == 0 {
                // No data within the poll interval; re-check the stop flag.
                continue;
            }
            sink.write_samples(&buf[..n])?;
            total += n as u64;
        }
        Ok(())
    })();

    let halted = device.stop();
    let finished = sink.finish();

    result?;
    halted?;
    finished?;
    Ok(total)
}

/// An active capture pipeline: one worker thread plus its stop flag.
///
/// The worker exclusively owns the device and sink while running. Stopping
/// joins the worker, so the device is fully released before the session is
/// gone and a restart cannot race the teardown.
pub struct CaptureSession {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<u64, CaptureError>>>,
}

impl CaptureSession {
    /// Spawn the capture worker.
    ///
    /// The device is constructed inside the worker because audio stream
    /// handles are not `Send`; open failures are reported back through a
    /// readiness acknowledgment, so a session only exists once its device
    /// is live. `events` receives [`TransportEvent::RecordingEnded`] when
    /// the worker exits its loop for any reason.
    pub fn spawn<D, S, F>(
        open_device: F,
        mut sink: S,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<Self, CaptureError>
    where
        D: CaptureDevice + 'static,
        S: SampleSink + Send + 'static,
        F: FnOnce() -> Result<D, CaptureDeviceError> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), CaptureDeviceError>>();

        let worker = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                let mut device = match open_device() {
                    Ok(device) => {
                        let _ = ready_tx.send(Ok(()));
                        device
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.clone()));
                        return Err(CaptureError::Device(e));
                    }
                };

                let result = run_capture_loop(&mut device, &mut sink, &stop_flag);
                let _ = events.send(TransportEvent::RecordingEnded);
                result
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                stop,
                worker: Some(worker),
            }),
            Ok(Err(device_err)) => {
                let _ = worker.join();
                Err(CaptureError::Device(device_err))
            }
            Err(_) => {
                let _ = worker.join();
                Err(CaptureError::NotReady)
            }
        }
    }

    /// Whether the worker has exited its loop (stop request or failure).
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Request stop and wait for the worker to exit.
    ///
    /// Returns the total samples captured, or the error that terminated
    /// the loop.
    pub fn stop(mut self) -> Result<u64, CaptureError> {
        self.stop.store(true, Ordering::SeqCst);
        match self.worker.take() {
            Some(handle) => handle.join().map_err(|_| CaptureError::WorkerPanicked)?,
            None => Err(CaptureError::WorkerPanicked),
        }
    }
}
