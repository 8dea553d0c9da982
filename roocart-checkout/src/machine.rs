//! The checkout state machine.
//!
//! Each call to [`CheckoutMachine::step`] runs the operation of the current
//! phase once, hands the result to the matching decision in
//! [`transition`](crate::transition) and applies the returned directive.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use roocart_core::{
    ApiError, BasketModal, Gateway, GatewayError, Item, ItemQueue, NotificationSink, Phase,
    Session,
};
use roocart_fetch::FixedBackoff;
use tracing::{debug, error, info, instrument, warn};

use crate::modal::{ModalAction, ModalPolicy};
use crate::report::RunReport;
use crate::transition::{self, Directive, ItemVerdict};

// ============================================================================
// Options
// ============================================================================

/// Knobs for a run.
#[derive(Debug, Clone, Default)]
pub struct MachineOptions {
    /// Wait after a rate-limit response.
    pub backoff: FixedBackoff,
    /// Halt once an item has been submitted this many times unconfirmed.
    /// `None` retries forever.
    pub max_item_attempts: Option<u32>,
    /// Start by checking the proxy egress address.
    pub verify_egress: bool,
    /// How basket modals are handled.
    pub modal_policy: ModalPolicy,
}

// ============================================================================
// Machine
// ============================================================================

/// Drives one checkout run from an empty basket to a placed order.
pub struct CheckoutMachine {
    gateway: Arc<dyn Gateway>,
    notifier: Arc<dyn NotificationSink>,
    options: MachineOptions,
    session: Session,
    queue: ItemQueue,
    phase: Phase,
    attempts: HashMap<String, u32>,
    report: RunReport,
}

impl CheckoutMachine {
    /// Creates a machine with a fresh session and the items in source order.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        notifier: Arc<dyn NotificationSink>,
        items: impl IntoIterator<Item = Item>,
        options: MachineOptions,
    ) -> Self {
        let session = Session::new();
        let phase = Phase::initial(options.verify_egress);
        let report = RunReport::new(session.checkout_id(), phase);

        Self {
            gateway,
            notifier,
            options,
            session,
            queue: items.into_iter().collect(),
            phase,
            attempts: HashMap::new(),
            report,
        }
    }

    /// Replaces the session, e.g. to pin the checkout id.
    pub fn with_session(mut self, session: Session) -> Self {
        self.report.checkout_id = session.checkout_id().to_string();
        self.session = session;
        self
    }

    /// Starts the run from a specific phase.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Returns the active phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the pending items.
    pub fn queue(&self) -> &ItemQueue {
        &self.queue
    }

    /// Returns the report so far.
    pub fn report(&self) -> RunReport {
        let mut report = self.report.clone();
        report.final_phase = self.phase;
        report.pending = self.queue.iter().map(|item| item.id().to_string()).collect();
        report.order_id = self.session.order_id().map(str::to_string);
        report
    }

    /// Runs until the machine reaches a terminal phase.
    pub async fn run(mut self) -> RunReport {
        info!(
            checkout_id = %self.session.checkout_id(),
            items = self.queue.len(),
            phase = %self.phase,
            "Starting checkout run"
        );

        while !self.phase.is_terminal() {
            self.step().await;
        }

        self.report()
    }

    /// Runs the current phase's operation once and returns the new phase.
    ///
    /// Terminal phases are left untouched.
    #[instrument(skip_all, fields(phase = %self.phase))]
    pub async fn step(&mut self) -> Phase {
        let directive = match self.phase {
            Phase::CheckProxyEgress => self.check_egress().await,
            Phase::ClearBasket => self.clear_basket().await,
            Phase::CollectItems => self.collect_item().await,
            Phase::Checkout => self.checkout().await,
            Phase::ExecutePayment => self.execute_payment().await,
            Phase::AuthChallenge => self.follow_challenge().await,
            Phase::Done | Phase::Halted => return self.phase,
        };

        self.apply(directive).await;
        self.phase
    }

    async fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Advance(next) => {
                if next != self.phase {
                    info!(from = %self.phase, to = %next, "Phase transition");
                }
                self.phase = next;
            }
            Directive::Stay => {}
            Directive::Backoff => {
                self.report.backoffs += 1;
                self.options.backoff.wait().await;
            }
            Directive::Halt(reason) => {
                error!(reason = %reason, "Run halted");
                self.report.halt_reason = Some(reason);
                self.phase = Phase::Halted;
            }
        }

        if self.phase.is_terminal() {
            self.report.finished_at = Some(Utc::now());
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    async fn check_egress(&mut self) -> Directive {
        self.report.gateway_calls += 1;
        let result = self.gateway.check_egress().await;

        match &result {
            Ok(report) => info!(origin = %report.origin, "Started on proxy"),
            Err(e) => log_gateway_error(e),
        }

        transition::after_egress(&result)
    }

    async fn clear_basket(&mut self) -> Directive {
        self.report.gateway_calls += 1;
        let result = self.gateway.clear_basket().await;

        match &result {
            Ok(outcome) => {
                log_api_errors(&outcome.errors);
                if outcome.success {
                    info!("Basket is clean");
                } else {
                    debug!("Basket not confirmed empty");
                }
            }
            Err(e) => log_gateway_error(e),
        }

        transition::after_clear_basket(&result)
    }

    async fn collect_item(&mut self) -> Directive {
        let Some(item) = self.queue.dequeue() else {
            return transition::after_item(true);
        };
        let item_id = item.id().to_string();

        self.report.gateway_calls += 1;
        self.report.submissions += 1;
        let result = self
            .gateway
            .add_item(&item, self.session.force_new())
            .await;

        match &result {
            Ok(outcome) => {
                self.apply_modals(&outcome.modals);
                log_api_errors(&outcome.errors);
            }
            Err(e) => log_gateway_error(e),
        }

        match transition::settle_item(&item_id, &result) {
            ItemVerdict::Committed => {
                info!(item_id = %item_id, remaining = self.queue.len(), "Item confirmed in basket");
                self.attempts.remove(&item_id);
                self.report.committed.push(item_id);
            }
            ItemVerdict::Requeue(cause) => {
                let attempts = self.attempts.entry(item_id.clone()).or_insert(0);
                *attempts += 1;
                let attempts = *attempts;
                debug!(item_id = %item_id, ?cause, attempts, "Item not confirmed, requeueing");

                if let Some(reason) =
                    transition::check_item_attempts(&item_id, attempts, self.options.max_item_attempts)
                {
                    self.queue.requeue_front(item);
                    return Directive::Halt(reason);
                }
                self.queue.enqueue(item);
            }
            ItemVerdict::RetryAfterBackoff => {
                self.queue.requeue_front(item);
                return Directive::Backoff;
            }
            ItemVerdict::Halt(reason) => {
                self.queue.requeue_front(item);
                return Directive::Halt(reason);
            }
        }

        transition::after_item(self.queue.is_empty())
    }

    fn apply_modals(&mut self, modals: &[BasketModal]) {
        for modal in modals {
            let rule = self.options.modal_policy.matching_rule(&modal.title);
            debug!(
                title = %modal.title,
                rule = rule.map_or("fallback", |r| r.name),
                "Basket modal"
            );
            match self.options.modal_policy.evaluate(modal) {
                ModalAction::ForceNewBasket => {
                    if self.session.mark_force_new() {
                        info!("New basket created");
                    }
                }
                ModalAction::ReportProblem => error!("Sorry, looks like there was a problem"),
                ModalAction::ReportTitle => warn!(title = %modal.title, "Basket modal"),
            }
        }
    }

    async fn checkout(&mut self) -> Directive {
        if let Some(plan) = self.session.payment_plan() {
            debug!(plan_id = %plan.id, "Payment plan already created");
            return Directive::Advance(Phase::ExecutePayment);
        }

        info!("Creating payment plan");
        self.report.gateway_calls += 1;
        let result = self
            .gateway
            .create_payment_plan(self.session.checkout_id())
            .await;

        match &result {
            Ok(outcome) => {
                log_api_errors(&outcome.errors);
                match &outcome.plan {
                    Some(plan) => {
                        info!(plan_id = %plan.id, "Payment plan created");
                        self.report.payment_plan_id = Some(plan.id.clone());
                        self.session.set_payment_plan(plan.clone());
                    }
                    None => warn!("Response carried no payment plan"),
                }
            }
            Err(e) => log_gateway_error(e),
        }

        transition::after_payment_plan(&result)
    }

    async fn execute_payment(&mut self) -> Directive {
        let Some(plan) = self.session.payment_plan().cloned() else {
            warn!("No payment plan yet, returning to checkout");
            return Directive::Advance(Phase::Checkout);
        };

        info!(plan_id = %plan.id, "Executing payment plan");
        self.report.gateway_calls += 1;
        let result = self
            .gateway
            .execute_payment_plan(&plan, self.session.checkout_id())
            .await;

        match &result {
            Ok(execution) if execution.errors.is_empty() => {
                info!(order_id = ?execution.order_id, "Payment plan executed");
                self.session
                    .record_order(execution.order_id.clone(), execution.challenge_url.clone());
            }
            Ok(execution) => log_api_errors(&execution.errors),
            Err(e) => log_gateway_error(e),
        }

        transition::after_execution(&result)
    }

    async fn follow_challenge(&mut self) -> Directive {
        let Some(url) = self.session.challenge_url().map(str::to_string) else {
            warn!("No challenge link recorded");
            return Directive::Advance(Phase::Done);
        };

        self.report.gateway_calls += 1;
        let result = self.gateway.follow_challenge(&url).await;

        match &result {
            Ok(roocart_core::ChallengeOutcome::Completed { status, url }) => {
                info!(status, url = %url, "Challenge answered without redirect");
            }
            Ok(roocart_core::ChallengeOutcome::RedirectRequired { .. }) => {}
            Err(e) => log_gateway_error(e),
        }

        if let Some(link) = transition::challenge_link(&result) {
            info!(url = %link, "Challenge needs a browser");
            match self.notifier.notify(link).await {
                Ok(()) => info!(channel = self.notifier.name(), "Challenge link sent"),
                Err(e) => warn!(channel = self.notifier.name(), error = %e, "Notification failed"),
            }
            self.report.notified_url = Some(link.to_string());
        }

        Directive::Advance(Phase::Done)
    }
}

// ============================================================================
// Logging helpers
// ============================================================================

fn log_gateway_error(error: &GatewayError) {
    match error {
        GatewayError::RateLimited => warn!("Too many requests"),
        GatewayError::Unauthorized => error!("Unauthorized"),
        GatewayError::ValidationRejected(body) => warn!(body = %body, "Request rejected"),
        other => warn!(error = %other, "Gateway call failed"),
    }
}

fn log_api_errors(errors: &[ApiError]) {
    for err in errors {
        if err.is_payment_declined() {
            error!("Payment declined");
        } else {
            error!(error = %err, "API error");
        }
    }
}
