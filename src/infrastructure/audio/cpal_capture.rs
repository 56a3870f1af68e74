//! Microphone capture via cpal
//!
//! Selects an input configuration as close as possible to 16 kHz mono,
//! converts and downmixes in the stream callback, and resamples to the
//! target rate when the device cannot run at 16 kHz. The stream callback
//! feeds a condvar-guarded queue; `read` drains it with a bounded wait so
//! the capture loop can keep polling its stop flag.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};

use crate::application::ports::{CaptureDevice, CaptureDeviceError};
use crate::domain::audio::StreamFormat;

/// How long one `read` waits for the callback to deliver samples
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Input chunk size fed to the resampler
const RESAMPLE_CHUNK: usize = 1024;

#[derive(Default)]
struct SharedState {
    queue: Mutex<QueueState>,
    ready: Condvar,
}

#[derive(Default)]
struct QueueState {
    samples: VecDeque<i16>,
    failed: Option<String>,
}

struct StreamResampler {
    inner: FftFixedIn<f32>,
}

impl StreamResampler {
    fn process_into(
        &mut self,
        input: &[i16],
        out: &mut Vec<i16>,
    ) -> Result<(), CaptureDeviceError> {
        let frames: Vec<f32> = input.iter().map(|&s| s as f32 / 32768.0).collect();
        let resampled = self
            .inner
            .process(&[frames], None)
            .map_err(|e| CaptureDeviceError::StreamFailed(format!("Resampling failed: {}", e)))?;
        out.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
        Ok(())
    }
}

/// Microphone adapter producing 16-bit mono samples at the target rate.
///
/// The handle is built and used on the capture worker; cpal streams are
/// not `Send`.
pub struct CpalCapture {
    stream: cpal::Stream,
    shared: Arc<SharedState>,
    resampler: Option<StreamResampler>,
    pending: Vec<i16>,
}

impl CpalCapture {
    /// Open the default input device for the given stream format.
    pub fn open(format: StreamFormat) -> Result<Self, CaptureDeviceError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureDeviceError::NoInputDevice)?;

        let (config, sample_format) = Self::select_input_config(&device, format.sample_rate)?;
        let device_rate = config.sample_rate.0;
        let channels = config.channels;

        let shared = Arc::new(SharedState::default());
        let stream =
            Self::build_stream(&device, &config, sample_format, channels, Arc::clone(&shared))?;

        let resampler = if device_rate != format.sample_rate {
            let inner = FftFixedIn::<f32>::new(
                device_rate as usize,
                format.sample_rate as usize,
                RESAMPLE_CHUNK,
                2,
                1,
            )
            .map_err(|e| {
                CaptureDeviceError::OpenFailed(format!("Resampler init failed: {}", e))
            })?;
            Some(StreamResampler { inner })
        } else {
            None
        };

        Ok(Self {
            stream,
            shared,
            resampler,
            pending: Vec::new(),
        })
    }

    /// Pick an input configuration, preferring ones that cover the target
    /// rate and fewer channels. Only i16 and f32 formats are considered.
    fn select_input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureDeviceError> {
        let supported = device.supported_input_configs().map_err(|e| {
            CaptureDeviceError::UnsupportedConfig(format!("Failed to query configs: {}", e))
        })?;

        let covers = |range: &cpal::SupportedStreamConfigRange| {
            range.min_sample_rate().0 <= target_rate && range.max_sample_rate().0 >= target_rate
        };

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for range in supported {
            if range.sample_format() != SampleFormat::I16
                && range.sample_format() != SampleFormat::F32
            {
                continue;
            }
            let better = match &best {
                None => true,
                Some(current) => {
                    (covers(&range) && !covers(current))
                        || (covers(&range) == covers(current)
                            && range.channels() < current.channels())
                }
            };
            if better {
                best = Some(range);
            }
        }

        let range = best.ok_or_else(|| {
            CaptureDeviceError::UnsupportedConfig(
                "No 16-bit or float input configuration available".into(),
            )
        })?;

        let sample_rate = if covers(&range) {
            SampleRate(target_rate)
        } else {
            range.min_sample_rate()
        };
        let sample_format = range.sample_format();
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        channels: u16,
        shared: Arc<SharedState>,
    ) -> Result<cpal::Stream, CaptureDeviceError> {
        let stream = match sample_format {
            SampleFormat::I16 => {
                let data_shared = Arc::clone(&shared);
                device.build_input_stream(
                    config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        push_samples(&data_shared, data, channels);
                    },
                    error_callback(shared),
                    None,
                )
            }
            SampleFormat::F32 => {
                let data_shared = Arc::clone(&shared);
                device.build_input_stream(
                    config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let converted: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        push_samples(&data_shared, &converted, channels);
                    },
                    error_callback(shared),
                    None,
                )
            }
            other => {
                return Err(CaptureDeviceError::UnsupportedConfig(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream.map_err(|e| CaptureDeviceError::OpenFailed(e.to_string()))
    }

    /// Wait (bounded) until the callback has queued `needed` samples.
    ///
    /// Returns an empty vec on timeout so the capture loop can re-check
    /// its stop flag. With `exact`, exactly `needed` samples are taken
    /// (the resampler consumes fixed chunks); otherwise everything queued
    /// is drained.
    fn wait_for_samples(
        &self,
        needed: usize,
        exact: bool,
    ) -> Result<Vec<i16>, CaptureDeviceError> {
        let mut state = self.shared.queue.lock().unwrap();
        if state.samples.len() < needed && state.failed.is_none() {
            let (next, _timed_out) = self
                .shared
                .ready
                .wait_timeout(state, POLL_INTERVAL)
                .unwrap();
            state = next;
        }

        if let Some(message) = state.failed.take() {
            return Err(CaptureDeviceError::StreamFailed(message));
        }
        if state.samples.len() < needed {
            return Ok(Vec::new());
        }

        let take = if exact { needed } else { state.samples.len() };
        Ok(state.samples.drain(..take).collect())
    }

    fn refill(&mut self) -> Result<(), CaptureDeviceError> {
        let (needed, exact) = match &self.resampler {
            Some(_) => (RESAMPLE_CHUNK, true),
            None => (1, false),
        };

        let device_samples = self.wait_for_samples(needed, exact)?;
        if device_samples.is_empty() {
            return Ok(());
        }

        match &mut self.resampler {
            None => self.pending.extend_from_slice(&device_samples),
            Some(resampler) => resampler.process_into(&device_samples, &mut self.pending)?,
        }
        Ok(())
    }
}

impl CaptureDevice for CpalCapture {
    fn start(&mut self) -> Result<(), CaptureDeviceError> {
        self.stream
            .play()
            .map_err(|e| CaptureDeviceError::StartFailed(e.to_string()))
    }

    fn read(&mut self, buf: &mut [i16]) -> Result<usize, CaptureDeviceError> {
        if self.pending.is_empty() {
            self.refill()?;
        }

        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }

    fn stop(&mut self) -> Result<(), CaptureDeviceError> {
        self.stream
            .pause()
            .map_err(|e| CaptureDeviceError::StreamFailed(e.to_string()))
    }
}

fn error_callback(shared: Arc<SharedState>) -> impl FnMut(cpal::StreamError) {
    move |err| {
        shared.queue.lock().unwrap().failed = Some(err.to_string());
        shared.ready.notify_all();
    }
}

fn push_samples(shared: &SharedState, data: &[i16], channels: u16) {
    let mono = mix_to_mono(data, channels);
    let mut state = shared.queue.lock().unwrap();
    state.samples.extend(mono);
    drop(state);
    shared.ready.notify_all();
}

/// Downmix interleaved frames by averaging
fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_to_mono_single_channel_is_identity() {
        let mono = vec![100i16, 200, 300];
        assert_eq!(mix_to_mono(&mono, 1), mono);
    }

    #[test]
    fn mix_to_mono_averages_stereo_frames() {
        let stereo = vec![100i16, 200, 300, 400];
        assert_eq!(mix_to_mono(&stereo, 2), vec![150, 350]);
    }

    #[test]
    fn mix_to_mono_handles_ragged_tail() {
        let stereo = vec![100i16, 200, 300];
        assert_eq!(mix_to_mono(&stereo, 2), vec![150, 300]);
    }

    #[test]
    fn queued_samples_are_drained_in_order() {
        let shared = SharedState::default();
        push_samples(&shared, &[1, 2, 3], 1);
        push_samples(&shared, &[4, 5], 1);

        let mut state = shared.queue.lock().unwrap();
        let drained: Vec<i16> = state.samples.drain(..).collect();
        assert_eq!(drained, vec![1, 2, 3, 4, 5]);
    }

    // Device-backed tests require audio hardware and are ignored in CI.

    #[test]
    #[ignore = "Requires audio hardware"]
    fn open_default_device() {
        let capture = CpalCapture::open(StreamFormat::default());
        assert!(capture.is_ok());
    }

    #[test]
    #[ignore = "Requires audio hardware"]
    fn capture_a_few_buffers() {
        let mut capture = CpalCapture::open(StreamFormat::default()).unwrap();
        capture.start().unwrap();

        let mut buf = [0i16; 1024];
        let mut total = 0;
        for _ in 0..100 {
            total += capture.read(&mut buf).unwrap();
            if total > 4096 {
                break;
            }
        }
        capture.stop().unwrap();
        assert!(total > 0);
    }
}
