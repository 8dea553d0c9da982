//! Trait definitions for `roocart`.
//!
//! The checkout machine only talks to the outside world through these two
//! seams, which keeps its decision logic testable with in-memory fakes.

use async_trait::async_trait;

use crate::error::{GatewayError, NotifyError};
use crate::models::{
    AddItemOutcome, ChallengeOutcome, ClearBasketOutcome, EgressReport, Item, PaymentExecution,
    PaymentPlan, PaymentPlanOutcome,
};

/// The remote ordering API.
///
/// Implementors are responsible for:
/// - Building the request (headers, query document, variables)
/// - Mapping status codes to [`GatewayError`]
/// - Decoding `200` payloads into the outcome types
///
/// Structured GraphQL errors are returned inside `Ok` outcomes.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Reports the public address requests leave from.
    async fn check_egress(&self) -> Result<EgressReport, GatewayError>;

    /// Empties the current basket.
    async fn clear_basket(&self) -> Result<ClearBasketOutcome, GatewayError>;

    /// Adds one item to the basket, optionally forcing a new basket.
    async fn add_item(&self, item: &Item, force_new: bool)
    -> Result<AddItemOutcome, GatewayError>;

    /// Creates a payment plan for the basket.
    async fn create_payment_plan(
        &self,
        checkout_id: &str,
    ) -> Result<PaymentPlanOutcome, GatewayError>;

    /// Executes a previously created payment plan.
    async fn execute_payment_plan(
        &self,
        plan: &PaymentPlan,
        checkout_id: &str,
    ) -> Result<PaymentExecution, GatewayError>;

    /// Follows a payment challenge link.
    async fn follow_challenge(&self, url: &str) -> Result<ChallengeOutcome, GatewayError>;
}

/// A one-way channel for messages that need a human.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short channel name for logs.
    fn name(&self) -> &str;

    /// Delivers a challenge link.
    async fn notify(&self, challenge_url: &str) -> Result<(), NotifyError>;
}
