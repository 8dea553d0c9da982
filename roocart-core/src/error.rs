//! Core error types for `roocart`.

use thiserror::Error;

/// Core error type for model construction and validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item descriptor was not a JSON object.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error returned by a [`Gateway`](crate::Gateway) call.
///
/// Structured GraphQL errors are not represented here: a `200` response
/// carrying an `errors` list is a successful call whose outcome holds the
/// errors for the caller to inspect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The provider answered `429 Too Many Requests`.
    #[error("Too many requests")]
    RateLimited,

    /// The provider answered `401 Unauthorized`.
    #[error("Unauthorized")]
    Unauthorized,

    /// The provider answered `422` and rejected the request body.
    #[error("Request rejected: {0}")]
    ValidationRejected(String),

    /// Any other non-success status.
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// Connection, TLS, proxy or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Returns true if the caller must stop issuing requests.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns true if the caller should wait before retrying.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Error returned by a [`NotificationSink`](crate::NotificationSink).
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The message could not be delivered.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// The channel answered with a non-success status.
    #[error("Channel rejected the message with status {0}")]
    Rejected(u16),
}
