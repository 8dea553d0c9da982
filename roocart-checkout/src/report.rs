//! Summary of a finished run.

use chrono::{DateTime, Utc};
use roocart_core::Phase;
use serde::Serialize;

use crate::transition::HaltReason;

/// What a run did, returned by [`CheckoutMachine::run`](crate::CheckoutMachine::run).
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Checkout id of the run.
    pub checkout_id: String,
    /// When the machine was created.
    pub started_at: DateTime<Utc>,
    /// When the machine reached a terminal phase.
    pub finished_at: Option<DateTime<Utc>>,
    /// Phase the run ended in.
    pub final_phase: Phase,
    /// Set when the run halted.
    pub halt_reason: Option<HaltReason>,
    /// Item ids confirmed in the basket, in confirmation order.
    pub committed: Vec<String>,
    /// Item ids still pending.
    pub pending: Vec<String>,
    /// Add-item calls issued.
    pub submissions: u32,
    /// Gateway calls issued, of any kind.
    pub gateway_calls: u32,
    /// Backoff waits taken.
    pub backoffs: u32,
    /// Placed order, if payment executed.
    pub order_id: Option<String>,
    /// Payment plan used.
    pub payment_plan_id: Option<String>,
    /// Link handed to the notification sink.
    pub notified_url: Option<String>,
}

impl RunReport {
    /// Creates an empty report for a run.
    pub fn new(checkout_id: impl Into<String>, phase: Phase) -> Self {
        Self {
            checkout_id: checkout_id.into(),
            started_at: Utc::now(),
            finished_at: None,
            final_phase: phase,
            halt_reason: None,
            committed: Vec::new(),
            pending: Vec::new(),
            submissions: 0,
            gateway_calls: 0,
            backoffs: 0,
            order_id: None,
            payment_plan_id: None,
            notified_url: None,
        }
    }

    /// Returns true if the run reached [`Phase::Done`].
    pub fn is_success(&self) -> bool {
        self.final_phase == Phase::Done
    }

    /// Wall-clock duration, once finished.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}
