// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `roocart` Core
//!
//! Core types, models, and traits for the `roocart` checkout runner.
//!
//! This crate provides the foundational abstractions used across all other
//! `roocart` crates, including:
//!
//! - Domain models (items, session, basket snapshots, payment plans)
//! - The pending item worklist
//! - Error types
//! - The gateway and notification seams the checkout machine drives
//!
//! ## Key Types
//!
//! ### Run State
//! - [`Phase`] - The active step of the checkout workflow
//! - [`Session`] - Per-run identity (checkout id, sticky flags, payment plan)
//! - [`ItemQueue`] - Items not yet confirmed in the remote basket
//!
//! ### Gateway Outcomes
//! - [`AddItemOutcome`] - Modals, errors and the basket snapshot of an add-item call
//! - [`PaymentPlanOutcome`] / [`PaymentExecution`] - Checkout API results
//! - [`ChallengeOutcome`] - Result of following a payment challenge link

pub mod error;
pub mod models;
pub mod queue;
pub mod traits;

// Re-export error types
pub use error::{CoreError, GatewayError, NotifyError};

// Re-export all model types
pub use models::{
    // Basket
    AddItemOutcome,
    BasketModal,
    BasketSnapshot,
    ClearBasketOutcome,
    Item,
    // Errors returned inside payloads
    ApiError,
    // Payment
    ChallengeOutcome,
    PaymentExecution,
    PaymentPlan,
    PaymentPlanOutcome,
    // Run state
    EgressReport,
    Phase,
    Session,
};

pub use queue::ItemQueue;

// Re-export traits
pub use traits::{Gateway, NotificationSink};
