use crate::events::AppEvent;
use async_channel::Sender;
use carousel::{DataSource, SpinConfig};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSecondsWithFrac, serde_as};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpinSettings {
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub min_duration: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub max_duration: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub initial_delay: Duration,
    pub growth_factor: f64,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub max_delay: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub reveal_delay: Duration,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self::from(&SpinConfig::default())
    }
}

impl From<&SpinConfig> for SpinSettings {
    fn from(c: &SpinConfig) -> Self {
        Self {
            min_duration: c.min_duration,
            max_duration: c.max_duration,
            initial_delay: c.initial_delay,
            growth_factor: c.growth_factor,
            max_delay: c.max_delay,
            reveal_delay: c.reveal_delay,
        }
    }
}

impl From<&SpinSettings> for SpinConfig {
    fn from(s: &SpinSettings) -> Self {
        SpinConfig {
            min_duration: s.min_duration,
            max_duration: s.max_duration,
            initial_delay: s.initial_delay,
            growth_factor: s.growth_factor,
            max_delay: s.max_delay,
            reveal_delay: s.reveal_delay,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub source: DataSource,
    #[serde(default)]
    pub spin: SpinSettings,
}

impl Config {
    pub fn spin_config(&self) -> SpinConfig {
        SpinConfig::from(&self.spin)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "whatoeat", "whatoeat")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("WHATOEAT").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn touches_config(event: &notify::Event, path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == path)
}

/// Sends `ConfigReload` whenever the config file changes. Returns once the
/// model stops listening.
pub async fn run_async_watcher(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let config_dir = config_path
        .parent()
        .ok_or(ConfigError::ConfigDirNotFound)?;
    fs_err::create_dir_all(config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Watch error: {}", e),
        }
    }

    Ok(())
}
