//! Fetch error types.

use roocart_core::GatewayError;
use thiserror::Error;

/// Error type for building and sending HTTP requests.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A configured header value is not valid header text.
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FetchError> for GatewayError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Http(e) if e.is_decode() => GatewayError::Parse(e.to_string()),
            FetchError::Json(e) => GatewayError::Parse(e.to_string()),
            other => GatewayError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let gateway: GatewayError = FetchError::Json(err).into();
        assert!(matches!(gateway, GatewayError::Parse(_)));
    }

    #[test]
    fn test_url_error_maps_to_transport() {
        let gateway: GatewayError = FetchError::InvalidUrl("nope".into()).into();
        assert_eq!(gateway, GatewayError::Transport("Invalid URL: nope".into()));
    }
}
