//! Configuration loading (`config.toml`).

use std::fs;
use std::path::PathBuf;

use mentor_core::config::MentorConfig;
use mentor_core::error::Result;

use crate::paths::MentorPaths;

/// Reads the application configuration.
///
/// A missing file yields defaults; a malformed file is logged and also yields
/// defaults so a typo never blocks a surface from starting.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_paths(paths: &MentorPaths) -> Self {
        Self::new(paths.config_file())
    }

    /// Loads the config, surfacing read and parse errors.
    pub fn try_load(&self) -> Result<Option<MentorConfig>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(toml::from_str(&content)?))
    }

    /// Loads the config, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> MentorConfig {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("[ConfigService] No config at {:?}, using defaults", self.path);
                MentorConfig::default()
            }
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Ignoring unreadable config at {:?}: {}",
                    self.path,
                    e
                );
                MentorConfig::default()
            }
        }
    }
}
