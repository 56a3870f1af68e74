//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::audio::Duration;
use crate::domain::config::Container;

/// QuickTape - record microphone audio to a file and play it back
#[derive(Parser, Debug)]
#[command(name = "quick-tape")]
#[command(version)]
#[command(about = "Record microphone audio to a file and play it back")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record from the microphone until interrupted or the duration elapses
    Record {
        /// Recording duration bound (e.g., 30s, 1m, 2m30s); unbounded if omitted
        #[arg(short = 'd', long, value_name = "TIME")]
        duration: Option<String>,

        /// Output file path
        #[arg(short = 'f', long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// File container
        #[arg(short = 'c', long, value_name = "CONTAINER")]
        container: Option<ContainerArg>,
    },
    /// Play a recorded file until it ends or playback is interrupted
    Play {
        /// Input file path
        #[arg(short = 'f', long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// File container
        #[arg(short = 'c', long, value_name = "CONTAINER")]
        container: Option<ContainerArg>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Container argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContainerArg {
    RawPcm,
    Wav,
}

impl From<ContainerArg> for Container {
    fn from(arg: ContainerArg) -> Self {
        match arg {
            ContainerArg::RawPcm => Container::RawPcm,
            ContainerArg::Wav => Container::Wav,
        }
    }
}

impl From<Container> for ContainerArg {
    fn from(container: Container) -> Self {
        match container {
            Container::RawPcm => ContainerArg::RawPcm,
            Container::Wav => ContainerArg::Wav,
        }
    }
}

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub file: PathBuf,
    pub container: Container,
    pub duration: Option<Duration>,
}

/// Parsed play options
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub file: PathBuf,
    pub container: Container,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["file", "container", "duration"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_record_defaults() {
        let cli = Cli::parse_from(["quick-tape", "record"]);
        if let Commands::Record {
            duration,
            file,
            container,
        } = cli.command
        {
            assert!(duration.is_none());
            assert!(file.is_none());
            assert!(container.is_none());
        } else {
            panic!("Expected Record command");
        }
    }

    #[test]
    fn cli_parses_record_duration() {
        let cli = Cli::parse_from(["quick-tape", "record", "-d", "30s"]);
        if let Commands::Record { duration, .. } = cli.command {
            assert_eq!(duration, Some("30s".to_string()));
        } else {
            panic!("Expected Record command");
        }
    }

    #[test]
    fn cli_parses_record_container() {
        let cli = Cli::parse_from(["quick-tape", "record", "-c", "wav"]);
        if let Commands::Record { container, .. } = cli.command {
            assert_eq!(container, Some(ContainerArg::Wav));
        } else {
            panic!("Expected Record command");
        }
    }

    #[test]
    fn cli_parses_play_file() {
        let cli = Cli::parse_from(["quick-tape", "play", "-f", "/tmp/take.pcm"]);
        if let Commands::Play { file, .. } = cli.command {
            assert_eq!(file, Some(PathBuf::from("/tmp/take.pcm")));
        } else {
            panic!("Expected Play command");
        }
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["quick-tape", "config", "init"]);
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Init
            }
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["quick-tape", "config", "set", "container", "wav"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "container");
            assert_eq!(value, "wav");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn container_arg_converts_both_ways() {
        assert_eq!(Container::from(ContainerArg::RawPcm), Container::RawPcm);
        assert_eq!(ContainerArg::from(Container::Wav), ContainerArg::Wav);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("file"));
        assert!(is_valid_config_key("container"));
        assert!(is_valid_config_key("duration"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
