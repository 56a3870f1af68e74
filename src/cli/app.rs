//! Main app runners for the record and play commands

use std::process::ExitCode;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::application::{PlaybackEnd, Transport};
use crate::application::ports::ConfigStore;
use crate::domain::audio::StreamFormat;
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    open_sink, open_source, CpalCapture, RodioPlayback, XdgConfigStore,
};

use super::args::{PlayOptions, RecordOptions};
use super::presenter::Presenter;
use super::signals::StopSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Run the record command
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();
    let format = StreamFormat::default();

    if let Some(parent) = options.file.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            presenter.error(&format!("Failed to create {}: {}", parent.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let sink = match open_sink(&options.file, options.container, format) {
        Ok(sink) => sink,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut stop_signal = match StopSignal::listen() {
        Ok(signal) => signal,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut transport = Transport::new(events_tx);

    if let Err(e) = transport.start_recording(move || CpalCapture::open(format), sink) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner("Recording... (Ctrl-C to stop)");
    let started = Instant::now();

    let deadline = options
        .duration
        .map(|d| tokio::time::Instant::now() + d.as_std());
    let bound = async {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(bound);

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(250));
    loop {
        tokio::select! {
            _ = stop_signal.recv() => break,
            _ = &mut bound => break,
            // The worker exited on its own; stop_recording surfaces why.
            _ = events.recv() => break,
            _ = ticker.tick() => {
                presenter.update_transport("Recording", started.elapsed().as_secs());
            }
        }
    }

    let stopped = tokio::task::spawn_blocking(move || transport.stop_recording()).await;

    match stopped {
        Ok(Ok(Some(samples))) => {
            presenter.spinner_success(&format!(
                "Recorded {:.1}s ({} samples) to {}",
                format.duration_secs(samples),
                samples,
                options.file.display()
            ));
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Ok(None)) => {
            presenter.stop_spinner();
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Err(e)) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&format!("Task join error: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the play command
pub async fn run_play(options: PlayOptions) -> ExitCode {
    let mut presenter = Presenter::new();
    let format = StreamFormat::default();

    let source = match open_source(&options.file, options.container, format) {
        Ok(source) => source,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut stop_signal = match StopSignal::listen() {
        Ok(signal) => signal,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut transport = Transport::new(events_tx);

    if let Err(e) = transport.start_playback(move || RodioPlayback::open(format), source) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner(&format!(
        "Playing {} (Ctrl-C to stop)",
        options.file.display()
    ));
    let started = Instant::now();

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(250));
    let interrupted = loop {
        tokio::select! {
            _ = stop_signal.recv() => break true,
            // Natural end; the event is the cue to reap the session.
            _ = events.recv() => break false,
            _ = ticker.tick() => {
                presenter.update_transport("Playing", started.elapsed().as_secs());
            }
        }
    };

    let stopped = tokio::task::spawn_blocking(move || {
        if interrupted {
            transport.stop_playback()
        } else {
            transport.finish_playback()
        }
    })
    .await;

    match stopped {
        Ok(Ok(Some(PlaybackEnd::EndOfStream))) => {
            presenter.spinner_success("Playback finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Ok(Some(PlaybackEnd::Stopped))) => {
            presenter.spinner_success("Playback stopped");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Ok(None)) => {
            presenter.stop_spinner();
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Err(e)) => {
            presenter.spinner_fail("Playback failed");
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.spinner_fail("Playback failed");
            presenter.error(&format!("Task join error: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
