// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # roocart Checkout
//!
//! The checkout workflow: clear the basket, add every item until the basket
//! confirms it, create and execute a payment plan, then hand any payment
//! challenge link to a human.
//!
//! ```text
//! CHECK_PROXY_EGRESS → CLEAR_BASKET → COLLECT_ITEMS → CHECKOUT
//!     → EXECUTE_PAYMENT → AUTH_CHALLENGE → DONE
//! ```
//!
//! - [`transition`] - Pure per-phase decisions
//! - [`modal`] - Ordered rules for basket modals
//! - [`machine::CheckoutMachine`] - Applies decisions and performs I/O
//! - [`report::RunReport`] - What a run did

pub mod machine;
pub mod modal;
pub mod report;
pub mod transition;

pub use machine::{CheckoutMachine, MachineOptions};
pub use modal::{ModalAction, ModalPolicy, ModalRule};
pub use report::RunReport;
pub use transition::{Directive, HaltReason, ItemVerdict, RequeueCause};
