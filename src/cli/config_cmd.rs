//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::audio::Duration;
use crate::domain::config::Container;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    validate_config_value(key, value)?;

    let mut config = store.load().await?;

    match key {
        "file" => config.file = Some(value.to_string()),
        "container" => config.container = Some(value.to_string()),
        "duration" => config.duration = Some(value.to_string()),
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;
    let value = match key {
        "file" => config.file,
        "container" => config.container,
        "duration" => config.duration,
        _ => unreachable!(), // Already validated
    };

    match value {
        Some(v) => presenter.key_value(key, &v),
        None => presenter.key_value(key, "(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value("file", config.file.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "container",
        config.container.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "duration",
        config.duration.as_deref().unwrap_or("(not set)"),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.key_value("config", &store.path().display().to_string());
    Ok(())
}

/// Validate a config value against its key's type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "container" => {
            value
                .parse::<Container>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        _ => {}
    }
    Ok(())
}
