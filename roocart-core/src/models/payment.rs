//! Payment plans, execution results and challenge outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api_error::ApiError;

/// Handle to a payment plan created by the checkout API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Plan identifier passed back on execution.
    pub id: String,
    /// The full `payment_plan` object as returned.
    #[serde(default)]
    pub raw: Value,
}

impl PaymentPlan {
    /// Creates a plan handle with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw: Value::Null,
        }
    }

    /// Builds a plan from the raw `payment_plan` object.
    ///
    /// Returns `None` when the object has no string `id`.
    pub fn from_raw(raw: Value) -> Option<Self> {
        let id = raw.get("id")?.as_str()?.to_string();
        Some(Self { id, raw })
    }
}

/// Result of a create-payment-plan call that returned `200`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentPlanOutcome {
    /// The created plan, if the payload carried one.
    pub plan: Option<PaymentPlan>,
    /// Structured errors in the payload.
    pub errors: Vec<ApiError>,
}

/// Result of an execute-payment-plan call that returned `200`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentExecution {
    /// Identifier of the placed order.
    pub order_id: Option<String>,
    /// 3-D Secure style challenge link that needs following.
    pub challenge_url: Option<String>,
    /// Structured errors in the payload.
    pub errors: Vec<ApiError>,
}

/// Result of following a challenge link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// The site answered `421`: a human has to open `url`.
    RedirectRequired {
        /// Final URL of the response, after redirects.
        url: String,
    },
    /// Any other response.
    Completed {
        /// HTTP status code.
        status: u16,
        /// Final URL of the response.
        url: String,
    },
}
