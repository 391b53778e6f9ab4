//! Error type shared by the cache, its stores and advice.

use std::string::FromUtf8Error;

/// Result alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors raised by the cache and its collaborators.
///
/// Store and decoder failures propagate to the caller unchanged. A missing key
/// is never an error; lookups return `Ok(None)` instead.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid UTF-8 in stored value: {0}")]
    Decode(#[from] FromUtf8Error),

    #[error("Cannot parse {value:?} as a number: {message}")]
    Format { value: String, message: String },

    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Build a `StoreUnavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Build a `Format` error for content that failed numeric parsing.
    pub fn format(value: &[u8], source: impl std::fmt::Display) -> Self {
        Self::Format {
            value: String::from_utf8_lossy(value).into_owned(),
            message: source.to_string(),
        }
    }

    /// True when the failure came from the backing store rather than from
    /// decoding or configuration.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::StoreUnavailable(format!("redis: {err}"))
    }
}
