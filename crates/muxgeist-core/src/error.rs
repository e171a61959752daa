//! Error types for decoding and configuration.

use thiserror::Error;

/// Why a `context:<id>` reply could not become a [`SessionContext`].
///
/// [`SessionContext`]: crate::types::SessionContext
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty response from daemon")]
    Empty,

    #[error("daemon reported an error: {0}")]
    Daemon(String),

    #[error("missing required header: {0}")]
    MissingField(&'static str),

    #[error("header {field:?} is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
