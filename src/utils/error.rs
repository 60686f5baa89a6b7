//! The `error` module defines the crate-wide error type.
//!
//! Almost nothing in the MQTT core is allowed to fail outward: inbound and
//! transport problems are logged and counted. The errors collected here are the
//! ones a caller can actually act on, such as a broken configuration file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A JSON document could not be encoded or decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
