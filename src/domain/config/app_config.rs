//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::audio::Duration;
use crate::domain::config::Container;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the recorded file
    pub file: Option<String>,
    /// On-disk container ("raw-pcm" or "wav")
    pub container: Option<String>,
    /// Recording duration bound (e.g. "30s"); unbounded when unset
    pub duration: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            file: None,
            container: Some(Container::default().to_string()),
            duration: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            file: other.file.or(self.file),
            container: other.container.or(self.container),
            duration: other.duration.or(self.duration),
        }
    }

    /// Get container as parsed Container, or the default if not set/invalid
    pub fn container_or_default(&self) -> Container {
        self.container
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get duration bound as parsed Duration; None means record until stopped
    pub fn duration_bound(&self) -> Option<Duration> {
        self.duration.as_ref().and_then(|s| s.parse().ok())
    }
}
