//! Sample storage port interfaces

use thiserror::Error;

/// Storage errors for sinks and sources
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed container: {0}")]
    Malformed(String),
}

/// Port for the capture target: a sequential sample append stream.
///
/// Opening truncates any existing file at the path. `finish` flushes and
/// closes exactly once; writing after `finish` is a contract violation.
pub trait SampleSink {
    /// Append `samples` to the sink.
    fn write_samples(&mut self, samples: &[i16]) -> Result<(), StorageError>;

    /// Flush buffered data and close the sink.
    fn finish(&mut self) -> Result<(), StorageError>;
}

/// Port for the playback origin: a sequential sample read stream.
pub trait SampleSource {
    /// Read up to `buf.len()` samples into `buf`.
    ///
    /// Returns the number of samples read. Zero means end-of-stream; a
    /// final partial buffer returns exactly the remaining count, never
    /// padded. End-of-stream is distinct from `Err`, which reports a real
    /// read failure.
    fn read_samples(&mut self, buf: &mut [i16]) -> Result<usize, StorageError>;
}

/// Blanket implementations so boxed trait objects flow through the
/// pipelines unchanged.
impl<T: SampleSink + ?Sized> SampleSink for Box<T> {
    fn write_samples(&mut self, samples: &[i16]) -> Result<(), StorageError> {
        (**self).write_samples(samples)
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        (**self).finish()
    }
}

impl<T: SampleSource + ?Sized> SampleSource for Box<T> {
    fn read_samples(&mut self, buf: &mut [i16]) -> Result<usize, StorageError> {
        (**self).read_samples(buf)
    }
}
