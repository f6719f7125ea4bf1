//! Error types for the teleop crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the transform, the configuration loader and the I/O adapter
#[derive(Debug, Error)]
pub enum TeleopError {
    /// The sample does not carry steering, throttle and trigger axes
    #[error("malformed sample: expected at least {expected} axes, found {found}")]
    MalformedSample { expected: usize, found: usize },

    /// An input line contained something that is not a number, or was not UTF-8
    #[error("cannot decode sample line {line}: invalid axis value {token:?}")]
    SampleDecode { line: usize, token: String },

    #[error("cannot read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid drive geometry: {0}")]
    InvalidDriveGeometry(String),

    /// Reading from the input channel failed
    #[error("failed to read joystick input: {0}")]
    Input(#[source] std::io::Error),

    /// Writing a command to the output channel failed
    #[error("failed to publish velocity command: {0}")]
    Publish(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TeleopError>;
