//! File storage adapters for the recorded sample stream

pub mod pcm;
pub mod wav;

use std::path::{Path, PathBuf};

use crate::application::ports::{SampleSink, SampleSource, StorageError};
use crate::domain::audio::StreamFormat;
use crate::domain::config::Container;

pub use pcm::{RawPcmSink, RawPcmSource};
pub use wav::{WavSink, WavSource};

/// Fixed default file name in the application cache directory
pub const DEFAULT_FILE_NAME: &str = "audiorecordtest.pcm";

/// Default capture file path: application-private cache directory plus the
/// fixed file name.
pub fn default_capture_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quick-tape")
        .join(DEFAULT_FILE_NAME)
}

/// Open a sink for the configured container, truncating any existing file.
pub fn open_sink(
    path: &Path,
    container: Container,
    format: StreamFormat,
) -> Result<Box<dyn SampleSink + Send>, StorageError> {
    match container {
        Container::RawPcm => Ok(Box::new(RawPcmSink::create(path)?)),
        Container::Wav => Ok(Box::new(WavSink::create(path, format)?)),
    }
}

/// Open a source for the configured container.
pub fn open_source(
    path: &Path,
    container: Container,
    format: StreamFormat,
) -> Result<Box<dyn SampleSource + Send>, StorageError> {
    match container {
        Container::RawPcm => Ok(Box::new(RawPcmSource::open(path)?)),
        Container::Wav => Ok(Box::new(WavSource::open(path, format)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_path_uses_cache_dir_and_fixed_name() {
        let path = default_capture_path();
        assert!(path.to_string_lossy().contains("quick-tape"));
        assert!(path.ends_with(DEFAULT_FILE_NAME));
    }

    #[test]
    fn container_dispatch_round_trip() {
        let dir = tempdir().unwrap();
        let format = StreamFormat::default();
        let samples = [3i16, -3, 300];

        for (container, name) in [(Container::RawPcm, "a.pcm"), (Container::Wav, "a.wav")] {
            let path = dir.path().join(name);
            let mut sink = open_sink(&path, container, format).unwrap();
            sink.write_samples(&samples).unwrap();
            sink.finish().unwrap();

            let mut source = open_source(&path, container, format).unwrap();
            let mut buf = [0i16; 8];
            assert_eq!(source.read_samples(&mut buf).unwrap(), 3);
            assert_eq!(&buf[..3], &samples);
        }
    }

    #[test]
    fn missing_source_file_reports_open_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.pcm");

        let err = open_source(&path, Container::RawPcm, StreamFormat::default()).err().unwrap();
        assert!(matches!(err, StorageError::Open { .. }));
    }
}
