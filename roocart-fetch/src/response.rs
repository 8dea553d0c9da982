//! Decoding of `200` GraphQL payloads into gateway outcomes.
//!
//! The wire types are lenient: any missing level of nesting decodes to
//! `None` instead of failing, and the outcome mappers decide what a missing
//! field means.

use roocart_core::models::item::menu_id;
use roocart_core::{
    AddItemOutcome, ApiError, BasketModal, BasketSnapshot, ClearBasketOutcome, PaymentExecution,
    PaymentPlan, PaymentPlanOutcome,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

// ============================================================================
// Envelope
// ============================================================================

/// Top-level GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    /// `data`, possibly null.
    pub data: Option<T>,
    /// `errors`, possibly absent.
    pub errors: Option<Vec<Value>>,
}

impl<T> GraphqlResponse<T> {
    fn into_parts(self) -> (Option<T>, Vec<ApiError>) {
        let errors = self
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(ApiError::new)
            .collect();
        (self.data, errors)
    }
}

// ============================================================================
// Clear Basket
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClearBasketData {
    clear_basket: Option<ClearBasketResult>,
}

#[derive(Debug, Deserialize)]
struct ClearBasketResult {
    #[serde(default)]
    success: Option<bool>,
}

/// Decodes a clear-basket payload.
pub fn parse_clear_basket(body: &str) -> Result<ClearBasketOutcome, serde_json::Error> {
    let response: GraphqlResponse<ClearBasketData> = serde_json::from_str(body)?;
    let (data, errors) = response.into_parts();

    let success = data
        .and_then(|d| d.clear_basket)
        .and_then(|r| r.success)
        .unwrap_or(false);

    Ok(ClearBasketOutcome { success, errors })
}

// ============================================================================
// Add Basket Item
// ============================================================================

#[derive(Debug, Deserialize)]
struct AddBasketItemData {
    add_basket_item: Option<AddBasketItemResult>,
}

#[derive(Debug, Deserialize)]
struct AddBasketItemResult {
    #[serde(default)]
    modals_on_load: Option<Vec<ModalWire>>,
    #[serde(default)]
    meta: Option<BasketMeta>,
}

#[derive(Debug, Deserialize)]
struct ModalWire {
    #[serde(default)]
    header: Option<ModalHeader>,
}

#[derive(Debug, Deserialize)]
struct ModalHeader {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BasketMeta {
    #[serde(default)]
    basket: Option<BasketWire>,
}

#[derive(Debug, Deserialize)]
struct BasketWire {
    #[serde(default)]
    items: Option<Vec<BasketLine>>,
}

#[derive(Debug, Deserialize)]
struct BasketLine {
    #[serde(default)]
    menu_item_drn_id: Option<Value>,
}

/// Decodes an add-basket-item payload.
///
/// The snapshot is `None` when the payload has no `meta.basket.items`.
pub fn parse_add_basket_item(body: &str) -> Result<AddItemOutcome, serde_json::Error> {
    let response: GraphqlResponse<AddBasketItemData> = serde_json::from_str(body)?;
    let (data, errors) = response.into_parts();
    let result = data.and_then(|d| d.add_basket_item);

    let Some(result) = result else {
        return Ok(AddItemOutcome {
            errors,
            ..Default::default()
        });
    };

    let modals = result
        .modals_on_load
        .unwrap_or_default()
        .into_iter()
        .filter_map(|modal| match modal.header.and_then(|h| h.title) {
            Some(title) => Some(BasketModal::new(title)),
            None => {
                debug!("Skipping modal without title");
                None
            }
        })
        .collect();

    let snapshot = result
        .meta
        .and_then(|m| m.basket)
        .and_then(|b| b.items)
        .map(|lines| {
            BasketSnapshot::new(
                lines
                    .iter()
                    .filter_map(|line| line.menu_item_drn_id.as_ref().and_then(menu_id)),
            )
        });

    Ok(AddItemOutcome {
        modals,
        snapshot,
        errors,
    })
}

// ============================================================================
// Payment Plan
// ============================================================================

#[derive(Debug, Deserialize)]
struct PaymentPlanData {
    #[serde(default)]
    payment_plan: Option<Value>,
}

/// Decodes a create-payment-plan payload.
pub fn parse_payment_plan(body: &str) -> Result<PaymentPlanOutcome, serde_json::Error> {
    let response: GraphqlResponse<PaymentPlanData> = serde_json::from_str(body)?;
    let (data, errors) = response.into_parts();

    let plan = data
        .and_then(|d| d.payment_plan)
        .and_then(PaymentPlan::from_raw);

    Ok(PaymentPlanOutcome { plan, errors })
}

// ============================================================================
// Payment Execution
// ============================================================================

#[derive(Debug, Deserialize)]
struct ExecutionData {
    #[serde(default)]
    payment_plan_execution_result: Option<ExecutionResult>,
}

#[derive(Debug, Deserialize)]
struct ExecutionResult {
    #[serde(default)]
    order_id: Option<Value>,
    #[serde(default)]
    challenge: Option<Challenge>,
}

#[derive(Debug, Deserialize)]
struct Challenge {
    #[serde(default)]
    url: Option<String>,
}

/// Decodes an execute-payment-plan payload.
pub fn parse_payment_execution(body: &str) -> Result<PaymentExecution, serde_json::Error> {
    let response: GraphqlResponse<ExecutionData> = serde_json::from_str(body)?;
    let (data, errors) = response.into_parts();
    let result = data.and_then(|d| d.payment_plan_execution_result);

    let (order_id, challenge_url) = match result {
        Some(result) => (
            result.order_id.as_ref().and_then(menu_id),
            result
                .challenge
                .and_then(|c| c.url)
                .filter(|url| !url.is_empty()),
        ),
        None => (None, None),
    };

    Ok(PaymentExecution {
        order_id,
        challenge_url,
        errors,
    })
}

// ============================================================================
// Egress
// ============================================================================

/// Body of the egress echo service.
#[derive(Debug, Deserialize)]
pub struct EgressBody {
    /// Public origin address.
    pub origin: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_basket_success() {
        let outcome = parse_clear_basket(r#"{"data":{"clear_basket":{"success":true}}}"#).unwrap();
        assert!(outcome.success);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_clear_basket_null_data() {
        let outcome =
            parse_clear_basket(r#"{"data":null,"errors":[{"message":"bad"}]}"#).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_add_item_snapshot_and_modals() {
        let body = r#"{
            "data": {
                "add_basket_item": {
                    "modals_on_load": [
                        { "header": { "title": "Create new basket?" } },
                        { "header": null }
                    ],
                    "meta": {
                        "basket": {
                            "items": [
                                { "menu_item_drn_id": "x", "quantity": 1 },
                                { "quantity": 3 }
                            ]
                        }
                    }
                }
            }
        }"#;

        let outcome = parse_add_basket_item(body).unwrap();
        assert_eq!(outcome.modals, vec![BasketModal::new("Create new basket?")]);
        assert_eq!(outcome.snapshot, Some(BasketSnapshot::new(["x"])));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_add_item_without_basket_has_no_snapshot() {
        let outcome =
            parse_add_basket_item(r#"{"data":{"add_basket_item":{"meta":{}}}}"#).unwrap();
        assert!(outcome.snapshot.is_none());

        let outcome = parse_add_basket_item(r#"{"data":{}}"#).unwrap();
        assert!(outcome.snapshot.is_none());
    }

    #[test]
    fn test_add_item_odd_line_ids_do_not_fail_snapshot() {
        let body = r#"{
            "data": {
                "add_basket_item": {
                    "meta": {
                        "basket": {
                            "items": [
                                { "menu_item_drn_id": "x" },
                                { "menu_item_drn_id": 42 },
                                { "menu_item_drn_id": { "drn": "y" } },
                                { "menu_item_drn_id": null }
                            ]
                        }
                    }
                }
            }
        }"#;

        let outcome = parse_add_basket_item(body).unwrap();
        let snapshot = outcome.confirmation_snapshot().unwrap();
        assert!(snapshot.contains("x"));
        assert!(snapshot.contains("42"));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_add_item_errors_kept() {
        let body = r#"{
            "data": { "add_basket_item": { "meta": { "basket": { "items": [] } } } },
            "errors": [{ "message": "item unavailable" }]
        }"#;
        let outcome = parse_add_basket_item(body).unwrap();
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.confirmation_snapshot().is_none());
    }

    #[test]
    fn test_payment_plan() {
        let outcome =
            parse_payment_plan(r#"{"data":{"payment_plan":{"id":"pp-7","total":{}}}}"#).unwrap();
        assert_eq!(outcome.plan.unwrap().id, "pp-7");

        let outcome = parse_payment_plan(r#"{"data":{"payment_plan":null}}"#).unwrap();
        assert!(outcome.plan.is_none());
    }

    #[test]
    fn test_payment_execution_with_challenge() {
        let body = r#"{
            "data": {
                "payment_plan_execution_result": {
                    "order_id": 123456,
                    "challenge": { "url": "https://deliveroo.ae/challenge/abc" }
                }
            }
        }"#;
        let execution = parse_payment_execution(body).unwrap();
        assert_eq!(execution.order_id.as_deref(), Some("123456"));
        assert_eq!(
            execution.challenge_url.as_deref(),
            Some("https://deliveroo.ae/challenge/abc")
        );
    }

    #[test]
    fn test_payment_execution_declined() {
        let body = r#"{
            "data": null,
            "errors": [{ "message": "x", "extensions": { "title": "Payment declined" } }]
        }"#;
        let execution = parse_payment_execution(body).unwrap();
        assert!(execution.order_id.is_none());
        assert!(execution.errors[0].is_payment_declined());
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(parse_payment_execution("<html>").is_err());
    }
}
