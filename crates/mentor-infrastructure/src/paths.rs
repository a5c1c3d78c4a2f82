//! Unified path management for mentor files.
//!
//! ```text
//! ~/.config/mentor/            # Config directory (or $MENTOR_HOME)
//! ├── config.toml              # Application configuration
//! ├── conversations.json       # Conversation mapping shared by all surfaces
//! ├── secret.json              # Credential override
//! └── logs/                    # Application logs
//!     └── mentor.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

/// Environment variable overriding the base directory.
pub const MENTOR_HOME_ENV: &str = "MENTOR_HOME";

const APP_DIR_NAME: &str = "mentor";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolved locations of every file the application owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentorPaths {
    base_dir: PathBuf,
}

impl MentorPaths {
    /// Resolves the base directory.
    ///
    /// Priority: explicit `base_path` > `$MENTOR_HOME` > platform config dir.
    pub fn new(base_path: Option<&Path>) -> Result<Self, PathError> {
        if let Some(base) = base_path {
            return Ok(Self::with_base(base));
        }

        if let Some(home) = std::env::var_os(MENTOR_HOME_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::with_base(Path::new(&home)));
        }

        let config_dir = dirs::config_dir().ok_or(PathError::ConfigDirNotFound)?;
        Ok(Self::with_base(&config_dir.join(APP_DIR_NAME)))
    }

    /// Uses `base` directly (tests, portable installs).
    pub fn with_base(base: &Path) -> Self {
        Self {
            base_dir: base.to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    pub fn conversations_file(&self) -> PathBuf {
        self.base_dir.join("conversations.json")
    }

    /// # Security Note
    ///
    /// Written with 600 permissions on Unix.
    pub fn secret_file(&self) -> PathBuf {
        self.base_dir.join("secret.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }
}
