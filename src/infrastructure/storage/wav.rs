//! WAV container storage via hound
//!
//! Wraps the same 16-bit mono sample stream in standard RIFF/WAVE
//! framing. One streaming code path serves both containers; only the
//! on-disk framing differs.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::application::ports::{SampleSink, SampleSource, StorageError};
use crate::domain::audio::StreamFormat;

fn wav_spec(format: StreamFormat) -> WavSpec {
    WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn map_hound(err: hound::Error) -> StorageError {
    match err {
        hound::Error::IoError(e) => StorageError::Io(e),
        other => StorageError::Malformed(other.to_string()),
    }
}

/// Sequential sample appender over a WAV file.
/// Opening truncates any existing file at the path.
pub struct WavSink {
    writer: Option<WavWriter<std::io::BufWriter<File>>>,
}

impl WavSink {
    /// Open `path` for writing, truncating any existing file.
    pub fn create(path: &Path, format: StreamFormat) -> Result<Self, StorageError> {
        let writer = WavWriter::create(path, wav_spec(format)).map_err(|e| match e {
            hound::Error::IoError(source) => StorageError::Open {
                path: path.display().to_string(),
                source,
            },
            other => map_hound(other),
        })?;
        Ok(Self {
            writer: Some(writer),
        })
    }
}

impl SampleSink for WavSink {
    fn write_samples(&mut self, samples: &[i16]) -> Result<(), StorageError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| StorageError::Io(std::io::Error::other("sink already finished")))?;

        for &sample in samples {
            writer.write_sample(sample).map_err(map_hound)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().map_err(map_hound)?;
        }
        Ok(())
    }
}

/// Sequential sample reader over a WAV file.
pub struct WavSource {
    reader: WavReader<BufReader<File>>,
}

impl WavSource {
    /// Open `path` for reading.
    ///
    /// The file must carry the stream format this application records:
    /// 16-bit integer samples at the expected rate and channel count.
    pub fn open(path: &Path, format: StreamFormat) -> Result<Self, StorageError> {
        let reader = WavReader::open(path).map_err(|e| match e {
            hound::Error::IoError(source) => StorageError::Open {
                path: path.display().to_string(),
                source,
            },
            other => map_hound(other),
        })?;

        let spec = reader.spec();
        let expected = wav_spec(format);
        if spec != expected {
            return Err(StorageError::Malformed(format!(
                "expected {}-bit {} Hz {}-channel PCM, found {}-bit {} Hz {}-channel",
                expected.bits_per_sample,
                expected.sample_rate,
                expected.channels,
                spec.bits_per_sample,
                spec.sample_rate,
                spec.channels,
            )));
        }

        Ok(Self { reader })
    }
}

impl SampleSource for WavSource {
    fn read_samples(&mut self, buf: &mut [i16]) -> Result<usize, StorageError> {
        let mut count = 0;
        let mut samples = self.reader.samples::<i16>();
        for slot in buf.iter_mut() {
            match samples.next() {
                Some(Ok(sample)) => {
                    *slot = sample;
                    count += 1;
                }
                Some(Err(e)) => return Err(map_hound(e)),
                None => break,
            }
        }
        Ok(count)
    }
}
