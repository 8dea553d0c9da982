//! In-memory gateway and notifier for driving the machine in tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use roocart_core::{
    AddItemOutcome, BasketModal, BasketSnapshot, ChallengeOutcome, ClearBasketOutcome,
    EgressReport, Gateway, GatewayError, Item, NotificationSink, NotifyError, PaymentExecution,
    PaymentPlan, PaymentPlanOutcome,
};
use serde_json::json;

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Egress,
    ClearBasket,
    AddItem { item_id: String, force_new: bool },
    CreatePlan { checkout_id: String },
    ExecutePlan { plan_id: String },
    FollowChallenge { url: String },
}

/// Scripted behaviour of one add-item call.
#[derive(Debug, Clone)]
pub enum AddScript {
    /// Put the item in the basket and report it.
    Accept,
    /// Answer 200 without keeping the item.
    SoftReject,
    /// Answer 200 with a modal and without keeping the item.
    Modal(&'static str),
    /// Return this exact result.
    Respond(Result<AddItemOutcome, GatewayError>),
}

/// Gateway answering from per-operation scripts, with sensible defaults
/// once a script runs dry.
#[derive(Default)]
pub struct FakeGateway {
    egress: Mutex<VecDeque<Result<EgressReport, GatewayError>>>,
    clear: Mutex<VecDeque<Result<ClearBasketOutcome, GatewayError>>>,
    add: Mutex<VecDeque<AddScript>>,
    plan: Mutex<VecDeque<Result<PaymentPlanOutcome, GatewayError>>>,
    execute: Mutex<VecDeque<Result<PaymentExecution, GatewayError>>>,
    challenge: Mutex<VecDeque<Result<ChallengeOutcome, GatewayError>>>,
    basket: Mutex<Vec<String>>,
    snapshots: Mutex<Vec<BasketSnapshot>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_egress(&self, result: Result<EgressReport, GatewayError>) -> &Self {
        self.egress.lock().unwrap().push_back(result);
        self
    }

    pub fn push_clear(&self, result: Result<ClearBasketOutcome, GatewayError>) -> &Self {
        self.clear.lock().unwrap().push_back(result);
        self
    }

    pub fn push_add(&self, script: AddScript) -> &Self {
        self.add.lock().unwrap().push_back(script);
        self
    }

    pub fn push_plan(&self, result: Result<PaymentPlanOutcome, GatewayError>) -> &Self {
        self.plan.lock().unwrap().push_back(result);
        self
    }

    pub fn push_execute(&self, result: Result<PaymentExecution, GatewayError>) -> &Self {
        self.execute.lock().unwrap().push_back(result);
        self
    }

    pub fn push_challenge(&self, result: Result<ChallengeOutcome, GatewayError>) -> &Self {
        self.challenge.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn snapshots(&self) -> Vec<BasketSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn current_basket(&self) -> BasketSnapshot {
        BasketSnapshot::new(self.basket.lock().unwrap().clone())
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn check_egress(&self) -> Result<EgressReport, GatewayError> {
        self.record(Call::Egress);
        self.egress.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(EgressReport {
                origin: "203.0.113.7".to_string(),
            })
        })
    }

    async fn clear_basket(&self) -> Result<ClearBasketOutcome, GatewayError> {
        self.record(Call::ClearBasket);
        let result = self
            .clear
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ClearBasketOutcome::cleared()));
        if matches!(&result, Ok(outcome) if outcome.success) {
            self.basket.lock().unwrap().clear();
        }
        result
    }

    async fn add_item(&self, item: &Item, force_new: bool) -> Result<AddItemOutcome, GatewayError> {
        self.record(Call::AddItem {
            item_id: item.id().to_string(),
            force_new,
        });

        let script = self
            .add
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(AddScript::Accept);

        let result = match script {
            AddScript::Accept => {
                self.basket.lock().unwrap().push(item.id().to_string());
                Ok(AddItemOutcome::with_snapshot(self.current_basket()))
            }
            AddScript::SoftReject => Ok(AddItemOutcome::with_snapshot(self.current_basket())),
            AddScript::Modal(title) => Ok(AddItemOutcome {
                modals: vec![BasketModal::new(title)],
                snapshot: Some(self.current_basket()),
                errors: Vec::new(),
            }),
            AddScript::Respond(result) => result,
        };

        if let Ok(outcome) = &result {
            if let Some(snapshot) = &outcome.snapshot {
                self.snapshots.lock().unwrap().push(snapshot.clone());
            }
        }
        result
    }

    async fn create_payment_plan(
        &self,
        checkout_id: &str,
    ) -> Result<PaymentPlanOutcome, GatewayError> {
        self.record(Call::CreatePlan {
            checkout_id: checkout_id.to_string(),
        });
        self.plan.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(PaymentPlanOutcome {
                plan: PaymentPlan::from_raw(json!({ "id": "plan-1" })),
                errors: Vec::new(),
            })
        })
    }

    async fn execute_payment_plan(
        &self,
        plan: &PaymentPlan,
        _checkout_id: &str,
    ) -> Result<PaymentExecution, GatewayError> {
        self.record(Call::ExecutePlan {
            plan_id: plan.id.clone(),
        });
        self.execute.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(PaymentExecution {
                order_id: Some("order-1".to_string()),
                challenge_url: None,
                errors: Vec::new(),
            })
        })
    }

    async fn follow_challenge(&self, url: &str) -> Result<ChallengeOutcome, GatewayError> {
        self.record(Call::FollowChallenge {
            url: url.to_string(),
        });
        self.challenge.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(ChallengeOutcome::Completed {
                status: 200,
                url: url.to_string(),
            })
        })
    }
}

/// Notifier recording every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            messages: Mutex::default(),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, challenge_url: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(challenge_url.to_string());
        if self.fail {
            Err(NotifyError::Rejected(500))
        } else {
            Ok(())
        }
    }
}

pub fn item(id: &str) -> Item {
    Item::from_value(json!({ "menu_item_drn_id": id, "quantity": 1, "modifier_groups": [] }))
        .unwrap()
}

pub fn items(ids: &[&str]) -> Vec<Item> {
    ids.iter().map(|id| item(id)).collect()
}
