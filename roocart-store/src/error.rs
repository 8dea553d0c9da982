//! Store error types.

use roocart_core::CoreError;
use thiserror::Error;

/// Errors raised while loading settings or items.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A setting is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The items file is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An entry of the items file is not an item.
    #[error("Item {index}: {source}")]
    Item {
        /// Position in the items file.
        index: usize,
        /// Underlying validation error.
        #[source]
        source: CoreError,
    },
}

impl StoreError {
    /// Shorthand for a missing required variable.
    pub(crate) fn missing(name: &str) -> Self {
        StoreError::Config(format!("{name} is not set"))
    }

    /// Shorthand for a variable that does not parse.
    pub(crate) fn invalid(name: &str, value: &str, expected: &str) -> Self {
        StoreError::Config(format!("{name}={value:?} is not {expected}"))
    }
}
