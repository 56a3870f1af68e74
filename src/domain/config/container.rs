//! File container value object
//!
//! One streaming code path serves both containers; the choice only affects
//! how samples are framed on disk.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidContainerError;

/// On-disk container for the recorded sample stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Container {
    /// Headerless big-endian 16-bit samples (the byte-exact wire format)
    #[default]
    RawPcm,
    /// Standard RIFF/WAVE framing around the same sample stream
    Wav,
}

impl Container {
    /// Get the canonical string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RawPcm => "raw-pcm",
            Self::Wav => "wav",
        }
    }

    /// All valid container names, for CLI help and config validation
    pub const fn all_names() -> &'static [&'static str] {
        &["raw-pcm", "wav"]
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Container {
    type Err = InvalidContainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw-pcm" | "raw" | "pcm" => Ok(Self::RawPcm),
            "wav" => Ok(Self::Wav),
            _ => Err(InvalidContainerError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        assert_eq!("raw-pcm".parse::<Container>().unwrap(), Container::RawPcm);
        assert_eq!("wav".parse::<Container>().unwrap(), Container::Wav);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("pcm".parse::<Container>().unwrap(), Container::RawPcm);
        assert_eq!("raw".parse::<Container>().unwrap(), Container::RawPcm);
        assert_eq!(" WAV ".parse::<Container>().unwrap(), Container::Wav);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "flac".parse::<Container>().unwrap_err();
        assert!(err.to_string().contains("flac"));
    }

    #[test]
    fn default_is_raw_pcm() {
        assert_eq!(Container::default(), Container::RawPcm);
    }

    #[test]
    fn display_round_trip() {
        for container in [Container::RawPcm, Container::Wav] {
            assert_eq!(
                container.as_str().parse::<Container>().unwrap(),
                container
            );
        }
    }
}
