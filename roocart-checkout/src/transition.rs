//! Pure transition decisions for each phase.
//!
//! Every function here maps a gateway result to a [`Directive`] without
//! touching the network or the session, so the whole policy can be checked
//! with plain values. The machine applies the directive.

use roocart_core::{
    AddItemOutcome, ChallengeOutcome, ClearBasketOutcome, EgressReport, GatewayError,
    PaymentExecution, PaymentPlanOutcome, Phase,
};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Directive
// ============================================================================

/// What the machine does after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Move to another phase.
    Advance(Phase),
    /// Keep the phase; the operation runs again on the next iteration.
    Stay,
    /// Keep the phase and wait one backoff interval first.
    Backoff,
    /// Stop the run.
    Halt(HaltReason),
}

/// Why a run stopped before reaching [`Phase::Done`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HaltReason {
    /// The API rejected the credentials.
    Unauthorized {
        /// Phase whose operation was rejected.
        phase: Phase,
    },
    /// An item was submitted the configured number of times without
    /// showing up in the basket.
    ItemRetriesExhausted {
        /// Identifier of the item.
        item_id: String,
        /// Submissions made.
        attempts: u32,
    },
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized { phase } => write!(f, "unauthorized during {phase}"),
            Self::ItemRetriesExhausted { item_id, attempts } => {
                write!(f, "item {item_id} not confirmed after {attempts} submissions")
            }
        }
    }
}

/// Common handling of a failed gateway call.
///
/// Rate limiting waits and retries, authorization failures halt, and
/// everything else leaves the phase to retry on the next iteration.
pub fn on_gateway_error(phase: Phase, error: &GatewayError) -> Directive {
    match error {
        GatewayError::RateLimited => Directive::Backoff,
        GatewayError::Unauthorized => Directive::Halt(HaltReason::Unauthorized { phase }),
        GatewayError::ValidationRejected(_)
        | GatewayError::UnexpectedStatus(_)
        | GatewayError::Transport(_)
        | GatewayError::Parse(_) => Directive::Stay,
    }
}

// ============================================================================
// Per-phase decisions
// ============================================================================

/// `CHECK_PROXY_EGRESS`: any failure waits, since retrying at once would
/// hammer a broken proxy.
pub fn after_egress(result: &Result<EgressReport, GatewayError>) -> Directive {
    match result {
        Ok(_) => Directive::Advance(Phase::ClearBasket),
        Err(GatewayError::Unauthorized) => Directive::Halt(HaltReason::Unauthorized {
            phase: Phase::CheckProxyEgress,
        }),
        Err(_) => Directive::Backoff,
    }
}

/// `CLEAR_BASKET`: only a confirmed-empty basket advances.
pub fn after_clear_basket(result: &Result<ClearBasketOutcome, GatewayError>) -> Directive {
    match result {
        Ok(outcome) if outcome.success => Directive::Advance(Phase::CollectItems),
        Ok(_) => Directive::Stay,
        Err(e) => on_gateway_error(Phase::ClearBasket, e),
    }
}

/// What happens to the item that was just submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemVerdict {
    /// The snapshot shows the item; drop it from the queue.
    Committed,
    /// Put the item at the back of the queue.
    Requeue(RequeueCause),
    /// Put the item at the front and wait: the same call is retried.
    RetryAfterBackoff,
    /// Put the item at the front and stop.
    Halt(HaltReason),
}

/// Why an item goes back into the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequeueCause {
    /// The basket snapshot does not list the item.
    NotInBasket,
    /// The payload carried structured errors.
    PayloadErrors,
    /// The payload had no basket at all.
    MissingBasket,
    /// The call itself failed (rejected, transport, parse).
    CallFailed,
}

/// `COLLECT_ITEMS`: confirms an item against the snapshot of its own call.
pub fn settle_item(item_id: &str, result: &Result<AddItemOutcome, GatewayError>) -> ItemVerdict {
    match result {
        Ok(outcome) if !outcome.errors.is_empty() => {
            ItemVerdict::Requeue(RequeueCause::PayloadErrors)
        }
        Ok(outcome) => match outcome.confirmation_snapshot() {
            Some(snapshot) if snapshot.contains(item_id) => ItemVerdict::Committed,
            Some(_) => ItemVerdict::Requeue(RequeueCause::NotInBasket),
            None => ItemVerdict::Requeue(RequeueCause::MissingBasket),
        },
        Err(e) => match on_gateway_error(Phase::CollectItems, e) {
            Directive::Backoff => ItemVerdict::RetryAfterBackoff,
            Directive::Halt(reason) => ItemVerdict::Halt(reason),
            Directive::Advance(_) | Directive::Stay => {
                ItemVerdict::Requeue(RequeueCause::CallFailed)
            }
        },
    }
}

/// Checks the per-item submission limit after an unconfirmed submission.
pub fn check_item_attempts(item_id: &str, attempts: u32, limit: Option<u32>) -> Option<HaltReason> {
    match limit {
        Some(max) if attempts >= max => Some(HaltReason::ItemRetriesExhausted {
            item_id: item_id.to_string(),
            attempts,
        }),
        _ => None,
    }
}

/// Phase after an item has been settled.
pub fn after_item(queue_empty: bool) -> Directive {
    if queue_empty {
        Directive::Advance(Phase::Checkout)
    } else {
        Directive::Stay
    }
}

/// `CHECKOUT`: advances once the response carries a plan.
pub fn after_payment_plan(result: &Result<PaymentPlanOutcome, GatewayError>) -> Directive {
    match result {
        Ok(outcome) if outcome.plan.is_some() => Directive::Advance(Phase::ExecutePayment),
        Ok(_) => Directive::Stay,
        Err(e) => on_gateway_error(Phase::Checkout, e),
    }
}

/// `EXECUTE_PAYMENT`: a challenge link needs following; an order without
/// one is complete.
pub fn after_execution(result: &Result<PaymentExecution, GatewayError>) -> Directive {
    match result {
        Ok(execution) if !execution.errors.is_empty() => Directive::Stay,
        Ok(execution) => match (&execution.order_id, &execution.challenge_url) {
            (_, Some(_)) => Directive::Advance(Phase::AuthChallenge),
            (Some(_), None) => Directive::Advance(Phase::Done),
            (None, None) => Directive::Stay,
        },
        Err(e) => on_gateway_error(Phase::ExecutePayment, e),
    }
}

/// `AUTH_CHALLENGE`: returns the link a human must open, if any.
///
/// The run ends whatever the outcome.
pub fn challenge_link(result: &Result<ChallengeOutcome, GatewayError>) -> Option<&str> {
    match result {
        Ok(ChallengeOutcome::RedirectRequired { url }) => Some(url.as_str()),
        Ok(ChallengeOutcome::Completed { .. }) | Err(_) => None,
    }
}
