//! Entry point for loading and storing the BlueTune config

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, LogLevel, PlatformSetting};
use directories::ProjectDirs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";

/// Owns the location of `config.toml` and every operation on it
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses the per-user config directory
    ///
    /// `~/.config/bluetune` on Linux, `~/Library/Application Support/bluetune`
    /// on macOS and `%APPDATA%\bluetune` on Windows.
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "bluetune").ok_or_else(|| {
            ConfigError::PathResolutionError {
                reason: "no home directory for the current user".to_string(),
            }
        })?;
        Self::with_directory(dirs.config_dir().to_path_buf())
    }

    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        Ok(Self {
            persistence: ConfigPersistence::new(config_dir.join(CONFIG_FILE)),
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Reads the file; a missing file yields defaults
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Validates, then writes atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Writes a default file unless one exists; true when a file was created
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::debug!("{} already exists", self.config_path().display());
            return Ok(false);
        }

        self.persistence.write_default()?;
        Ok(true)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.persistence.write_default()
    }

    /// Human-readable problems with the stored config, empty when valid
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        Ok(self
            .load()?
            .validate()
            .err()
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// Loads the config file and applies `BLUETUNE_*` environment overrides
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!("Invalid values after env overrides: {:?}", errors);
        }

        Ok(config)
    }
}

/// Applies overrides of the form `BLUETUNE_SECTION_FIELD=value`
///
/// `lookup` resolves a variable name; values that do not parse are logged
/// and skipped.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = parse_override::<f32, _>(&lookup, "BLUETUNE_PLAYER_DEFAULT_VOLUME") {
        config.player.default_volume = v;
    }

    if let Some(v) = parse_override::<PlatformSetting, _>(&lookup, "BLUETUNE_PAIRING_PLATFORM") {
        config.pairing.platform = v;
    }

    if let Some(v) = parse_override::<u64, _>(&lookup, "BLUETUNE_PAIRING_PROMPT_GRACE_MS") {
        config.pairing.prompt_grace_ms = v;
    }

    if let Some(v) = parse_override::<LogLevel, _>(&lookup, "BLUETUNE_APP_LOG_LEVEL") {
        config.app.log_level = v;
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => {
            log::debug!("{} override applied", key);
            Some(value)
        }
        Err(e) => {
            log::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
