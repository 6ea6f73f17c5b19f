//! Configuration error type.

use std::fmt;
use std::path::PathBuf;

/// Errors produced while loading, saving or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    Io(std::io::Error),
    /// The config file is not valid TOML for [`crate::Config`].
    Parse { path: PathBuf, message: String },
    /// Serializing the configuration failed.
    Serialize(String),
    /// A value is out of its allowed range.
    Invalid(String),
    /// No platform config directory could be determined.
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { path, message } => {
                write!(f, "failed to parse {}: {message}", path.display())
            }
            Self::Serialize(msg) => write!(f, "failed to serialize config: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
            Self::NoConfigDir => write!(f, "could not determine a config directory"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
