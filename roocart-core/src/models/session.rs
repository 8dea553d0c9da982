//! Workflow phase and per-run session identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::payment::PaymentPlan;

// ============================================================================
// Phase
// ============================================================================

/// The active step of the checkout workflow.
///
/// Exactly one phase is active at a time and it alone decides which gateway
/// operation runs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Verify the upstream proxy before touching the basket.
    CheckProxyEgress,
    /// Empty any basket left over from earlier runs.
    ClearBasket,
    /// Add queued items until every one is confirmed.
    CollectItems,
    /// Create the payment plan.
    Checkout,
    /// Execute the payment plan.
    ExecutePayment,
    /// Follow the challenge link returned by payment.
    AuthChallenge,
    /// Run finished.
    Done,
    /// Run stopped on a fatal error.
    Halted,
}

impl Phase {
    /// Returns the phase a run starts in.
    pub fn initial(verify_egress: bool) -> Self {
        if verify_egress {
            Self::CheckProxyEgress
        } else {
            Self::ClearBasket
        }
    }

    /// Whether this is a terminal phase (no further operations).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Halted)
    }

    /// Returns the label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::CheckProxyEgress => "CHECK_PROXY_EGRESS",
            Self::ClearBasket => "CLEAR_BASKET",
            Self::CollectItems => "COLLECT_ITEMS",
            Self::Checkout => "CHECKOUT",
            Self::ExecutePayment => "EXECUTE_PAYMENT",
            Self::AuthChallenge => "AUTH_CHALLENGE",
            Self::Done => "DONE",
            Self::Halted => "HALTED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Session
// ============================================================================

/// Identity and handles that live for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    checkout_id: String,
    force_new: bool,
    payment_plan: Option<PaymentPlan>,
    order_id: Option<String>,
    challenge_url: Option<String>,
}

impl Session {
    /// Creates a session with a fresh random checkout id.
    pub fn new() -> Self {
        Self::with_checkout_id(Uuid::new_v4().to_string())
    }

    /// Creates a session with a fixed checkout id.
    pub fn with_checkout_id(checkout_id: impl Into<String>) -> Self {
        Self {
            checkout_id: checkout_id.into(),
            force_new: false,
            payment_plan: None,
            order_id: None,
            challenge_url: None,
        }
    }

    /// Returns the checkout id sent with every checkout API call.
    pub fn checkout_id(&self) -> &str {
        &self.checkout_id
    }

    /// Returns true if add-item calls must ask for a new basket.
    pub fn force_new(&self) -> bool {
        self.force_new
    }

    /// Sets the sticky force-new flag. Returns true if it was not set before.
    pub fn mark_force_new(&mut self) -> bool {
        let changed = !self.force_new;
        self.force_new = true;
        changed
    }

    /// Returns the payment plan, once created.
    pub fn payment_plan(&self) -> Option<&PaymentPlan> {
        self.payment_plan.as_ref()
    }

    /// Stores the payment plan.
    ///
    /// The first plan wins: returns false and keeps the existing plan if one
    /// is already set.
    pub fn set_payment_plan(&mut self, plan: PaymentPlan) -> bool {
        if self.payment_plan.is_some() {
            return false;
        }
        self.payment_plan = Some(plan);
        true
    }

    /// Records the result of a payment execution.
    pub fn record_order(&mut self, order_id: Option<String>, challenge_url: Option<String>) {
        if order_id.is_some() {
            self.order_id = order_id;
        }
        if challenge_url.is_some() {
            self.challenge_url = challenge_url;
        }
    }

    /// Returns the order id, once payment executed.
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    /// Returns the pending challenge link.
    pub fn challenge_url(&self) -> Option<&str> {
        self.challenge_url.as_deref()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Egress Report
// ============================================================================

/// Public address the gateway sees, as reported by the egress echo service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressReport {
    /// Origin address(es), e.g. `203.0.113.7`.
    pub origin: String,
}
