//! Policy for basket modals returned by add-item.
//!
//! Rules are checked in order and the first match wins; a title that no rule
//! matches falls through to the default action.

use roocart_core::BasketModal;

/// Title fragment of the modal offering to replace a basket from another
/// restaurant.
pub const CREATE_NEW_BASKET: &str = "Create new basket?";

/// Title fragment of the generic failure modal.
pub const GENERIC_PROBLEM: &str = "Sorry, looks like there was a problem";

/// What to do about a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Set the sticky `force_new` flag for later add-item calls.
    ForceNewBasket,
    /// Report the generic failure.
    ReportProblem,
    /// Report the modal title.
    ReportTitle,
}

/// One `(predicate, action)` pair.
#[derive(Debug, Clone, Copy)]
pub struct ModalRule {
    /// Rule name for logs.
    pub name: &'static str,
    /// Title predicate.
    pub matches: fn(&str) -> bool,
    /// Action when the predicate holds.
    pub action: ModalAction,
}

/// Ordered modal rules with a default.
#[derive(Debug, Clone)]
pub struct ModalPolicy {
    rules: Vec<ModalRule>,
    fallback: ModalAction,
}

impl ModalPolicy {
    /// Creates a policy from explicit rules.
    pub fn new(rules: Vec<ModalRule>, fallback: ModalAction) -> Self {
        Self { rules, fallback }
    }

    /// Returns the action for a modal.
    pub fn evaluate(&self, modal: &BasketModal) -> ModalAction {
        self.matching_rule(&modal.title)
            .map_or(self.fallback, |rule| rule.action)
    }

    /// Returns the first rule matching the title.
    pub fn matching_rule(&self, title: &str) -> Option<&ModalRule> {
        self.rules.iter().find(|rule| (rule.matches)(title))
    }
}

impl Default for ModalPolicy {
    fn default() -> Self {
        Self::new(
            vec![
                ModalRule {
                    name: "create_new_basket",
                    matches: |title| title.contains(CREATE_NEW_BASKET),
                    action: ModalAction::ForceNewBasket,
                },
                ModalRule {
                    name: "generic_problem",
                    matches: |title| title.contains(GENERIC_PROBLEM),
                    action: ModalAction::ReportProblem,
                },
            ],
            ModalAction::ReportTitle,
        )
    }
}
