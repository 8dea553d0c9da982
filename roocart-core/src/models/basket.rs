//! Basket snapshots, modals and basket call outcomes.

use serde::{Deserialize, Serialize};

use super::api_error::ApiError;

// ============================================================================
// Basket Snapshot
// ============================================================================

/// Item identifiers the gateway reports as currently in the basket.
///
/// A snapshot arrives with every add-item response and is only used to
/// confirm the item that was just submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketSnapshot {
    /// Menu identifiers of the basket lines, in the order reported.
    pub item_ids: Vec<String>,
}

impl BasketSnapshot {
    /// Creates a snapshot from a list of identifiers.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            item_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the basket holds a line with this identifier.
    pub fn contains(&self, item_id: &str) -> bool {
        self.item_ids.iter().any(|id| id == item_id)
    }

    /// Returns the number of basket lines.
    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    /// Returns true if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }
}

// ============================================================================
// Basket Modal
// ============================================================================

/// A popup the basket API attaches to an add-item response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketModal {
    /// Header title, e.g. `Create new basket?`.
    pub title: String,
}

impl BasketModal {
    /// Creates a modal with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a clear-basket call that returned `200`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClearBasketOutcome {
    /// `data.clear_basket.success`.
    pub success: bool,
    /// Structured errors in the payload.
    pub errors: Vec<ApiError>,
}

impl ClearBasketOutcome {
    /// A confirmed-empty basket.
    pub fn cleared() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }
}

/// Result of an add-item call that returned `200`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddItemOutcome {
    /// `modals_on_load`, in response order.
    pub modals: Vec<BasketModal>,
    /// Basket contents after the call; `None` when the payload had no basket.
    pub snapshot: Option<BasketSnapshot>,
    /// Structured errors in the payload.
    pub errors: Vec<ApiError>,
}

impl AddItemOutcome {
    /// An outcome that only carries a snapshot.
    pub fn with_snapshot(snapshot: BasketSnapshot) -> Self {
        Self {
            modals: Vec::new(),
            snapshot: Some(snapshot),
            errors: Vec::new(),
        }
    }

    /// Returns the snapshot usable for confirmation.
    ///
    /// A response carrying errors never confirms anything, even if it also
    /// holds a basket.
    pub fn confirmation_snapshot(&self) -> Option<&BasketSnapshot> {
        if self.errors.is_empty() {
            self.snapshot.as_ref()
        } else {
            None
        }
    }
}
