//! Structured errors carried in the `errors` list of a GraphQL response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Extension title the checkout API uses for a declined card.
pub const PAYMENT_DECLINED_TITLE: &str = "Payment declined";

/// One entry of a GraphQL `errors` array, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiError(Value);

impl ApiError {
    /// Wraps a raw error object.
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Returns `extensions.title`, if present.
    pub fn title(&self) -> Option<&str> {
        self.0.get("extensions")?.get("title")?.as_str()
    }

    /// Returns the top-level `message`, if present.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message")?.as_str()
    }

    /// Returns true if this is the payment declined error.
    pub fn is_payment_declined(&self) -> bool {
        self.title() == Some(PAYMENT_DECLINED_TITLE)
    }

    /// Returns the raw error object.
    pub fn raw(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
