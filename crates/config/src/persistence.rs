//! Reading and writing `config.toml`
//!
//! Saves go to a temp file in the target directory and are renamed over the
//! old file, after copying it to `config.toml.backup`. A reader never sees a
//! half-written file.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct ConfigPersistence {
    path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn backup_path(&self) -> PathBuf {
        self.path.with_extension("toml.backup")
    }

    /// Reads the config file
    ///
    /// A missing file yields defaults. A blank file is treated as damage
    /// rather than as "use defaults", so it is reported as a read error.
    /// Values that fail validation are kept and only logged, letting the user
    /// fix them by hand.
    pub fn load(&self) -> ConfigResult<Config> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(self.read_error(e)),
        };

        if text.trim().is_empty() {
            return Err(self.read_error(io::Error::new(
                io::ErrorKind::InvalidData,
                "config file is blank",
            )));
        }

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: self.path.clone(),
            source,
        })?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "{} has version {}, this build understands {}; unknown keys are ignored",
                self.path.display(),
                config.version,
                CONFIG_VERSION
            );
        }

        if let Err(errors) = config.validate() {
            log::warn!(
                "{} has invalid values: {}",
                self.path.display(),
                join_errors(&errors)
            );
        }

        Ok(config)
    }

    /// Validates and writes `config`, keeping the previous file as a backup
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError(join_errors(&errors)))?;

        let dir = self
            .path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: format!("{} has no parent directory", self.path.display()),
            })?;
        create_dir(dir)?;

        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())
                .map_err(|source| ConfigError::BackupError { source })?;
        }

        let text = toml::to_string_pretty(config)?;
        self.replace_with(dir, &text)?;

        log::info!("Saved config to {}", self.path.display());
        Ok(())
    }

    /// Overwrites the file with defaults
    pub fn write_default(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    fn replace_with(&self, dir: &Path, text: &str) -> ConfigResult<()> {
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(text.as_bytes())?;
        staged.flush()?;

        staged
            .persist(&self.path)
            .map_err(|e| ConfigError::WriteError {
                path: self.path.clone(),
                source: e.error,
            })?;
        Ok(())
    }

    fn read_error(&self, source: io::Error) -> ConfigError {
        ConfigError::ReadError {
            path: self.path.clone(),
            source,
        }
    }
}

fn create_dir(dir: &Path) -> ConfigResult<()> {
    if dir.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|source| ConfigError::DirectoryCreationError {
        path: dir.to_path_buf(),
        source,
    })?;
    log::debug!("Created {}", dir.display());
    Ok(())
}

fn join_errors(errors: &[crate::ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
