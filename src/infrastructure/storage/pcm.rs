//! Raw PCM file storage
//!
//! The headerless container: a flat sequence of 16-bit signed samples,
//! high byte first, no length field. Consumers read until end-of-stream.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::application::ports::{SampleSink, SampleSource, StorageError};
use crate::domain::audio::codec;
use crate::domain::audio::BUFFER_SAMPLES;

/// Sequential sample appender over a raw PCM file.
/// Opening truncates any existing file at the path.
pub struct RawPcmSink {
    writer: Option<BufWriter<File>>,
    scratch: Vec<u8>,
}

impl RawPcmSink {
    /// Open `path` for writing, truncating any existing file.
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        let file = File::create(path).map_err(|e| StorageError::Open {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            scratch: Vec::with_capacity(codec::encoded_len(BUFFER_SAMPLES)),
        })
    }
}

impl SampleSink for RawPcmSink {
    fn write_samples(&mut self, samples: &[i16]) -> Result<(), StorageError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| StorageError::Io(std::io::Error::other("sink already finished")))?;

        self.scratch.clear();
        codec::encode_samples(samples, &mut self.scratch);
        writer.write_all(&self.scratch)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Sequential sample reader over a raw PCM file.
pub struct RawPcmSource {
    reader: BufReader<File>,
    scratch: Vec<u8>,
}

impl RawPcmSource {
    /// Open `path` for reading.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let file = File::open(path).map_err(|e| StorageError::Open {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            reader: BufReader::new(file),
            scratch: vec![0; codec::encoded_len(BUFFER_SAMPLES)],
        })
    }
}

impl SampleSource for RawPcmSource {
    fn read_samples(&mut self, buf: &mut [i16]) -> Result<usize, StorageError> {
        let wanted = codec::encoded_len(buf.len());
        if self.scratch.len() < wanted {
            self.scratch.resize(wanted, 0);
        }

        let mut filled = 0;
        while filled < wanted {
            match self.reader.read(&mut self.scratch[filled..wanted]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        // An incomplete trailing sample cannot be decoded; it marks the
        // end of the stream.
        Ok(codec::decode_samples(&self.scratch[..filled], buf))
    }
}
