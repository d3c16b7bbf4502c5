//! Error types
//!
//! Two families: errors that stop a run before any codec is invoked
//! ([`ConfigError`], [`LoadError`]) and per-codec failures that are
//! reported as data ([`FailureKind`] inside a [`crate::CodecFailure`]).

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by codec implementations (encoders, compressors)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration errors. Fatal, raised before the harness runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two codec entries share a display name.
    #[error("duplicate codec name '{0}'")]
    DuplicateName(String),

    /// A format name in the config does not match any built-in format.
    #[error("unknown format '{0}'")]
    UnknownFormat(String),

    /// The compression method was compiled out (cargo feature disabled).
    #[error("compression method '{0}' is not enabled in this build")]
    UnsupportedCompression(String),

    /// Failed to read the configuration file.
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Dataset loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record is not valid JSON. `line` is 1-based.
    #[error("invalid JSON record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Which step of a codec evaluation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    EncodeFailed,
    CompressFailed,
    Timeout,
    /// The worker thread went away without reporting a result
    WorkerLost,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::EncodeFailed => write!(f, "encode failed"),
            FailureKind::CompressFailed => write!(f, "compress failed"),
            FailureKind::Timeout => write!(f, "timed out"),
            FailureKind::WorkerLost => write!(f, "worker lost"),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
