//! Domain models for `roocart`.
//!
//! ## Submodules
//!
//! - [`item`] - Order-line descriptors loaded from the static item list
//! - [`basket`] - Basket snapshots, modals and basket call outcomes
//! - [`payment`] - Payment plans, execution results and challenge outcomes
//! - [`session`] - Workflow phase and per-run session identity
//! - [`api_error`] - Structured errors returned inside GraphQL payloads

pub mod api_error;
pub mod basket;
pub mod item;
pub mod payment;
pub mod session;

pub use api_error::ApiError;
pub use basket::{AddItemOutcome, BasketModal, BasketSnapshot, ClearBasketOutcome};
pub use item::Item;
pub use payment::{ChallengeOutcome, PaymentExecution, PaymentPlan, PaymentPlanOutcome};
pub use session::{EgressReport, Phase, Session};
