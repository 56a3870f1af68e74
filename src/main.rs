//! QuickTape CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use quick_tape::cli::{
    app::{load_merged_config, run_play, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, PlayOptions, RecordOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use quick_tape::domain::audio::Duration;
use quick_tape::domain::config::{AppConfig, Container};
use quick_tape::infrastructure::{default_capture_path, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Record {
            duration,
            file,
            container,
        } => {
            let cli_config = AppConfig {
                file: file.map(|p| p.to_string_lossy().into_owned()),
                container: container.map(|c| Container::from(c).to_string()),
                duration,
            };
            let config = load_merged_config(cli_config).await;

            // An explicit but unparsable duration is a usage error, not a
            // silent fallback.
            let duration = match config.duration.as_ref() {
                Some(s) => match s.parse::<Duration>() {
                    Ok(d) => Some(d),
                    Err(e) => {
                        presenter.error(&e.to_string());
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => None,
            };

            let options = RecordOptions {
                file: config
                    .file
                    .clone()
                    .map(PathBuf::from)
                    .unwrap_or_else(default_capture_path),
                container: config.container_or_default(),
                duration,
            };

            run_record(options).await
        }
        Commands::Play { file, container } => {
            let cli_config = AppConfig {
                file: file.map(|p| p.to_string_lossy().into_owned()),
                container: container.map(|c| Container::from(c).to_string()),
                duration: None,
            };
            let config = load_merged_config(cli_config).await;

            let options = PlayOptions {
                file: config
                    .file
                    .clone()
                    .map(PathBuf::from)
                    .unwrap_or_else(default_capture_path),
                container: config.container_or_default(),
            };

            run_play(options).await
        }
    }
}
