//! GraphQL request bodies for the basket and checkout APIs.
//!
//! Query documents are embedded at build time; variables are built per call.

use roocart_core::Item;
use serde::Serialize;
use serde_json::{Value, json};

/// Clear-basket mutation.
pub const CLEAR_BASKET_QUERY: &str = include_str!("../graphql/clear_basket.graphql");

/// Add-basket-item mutation.
pub const ADD_BASKET_ITEM_QUERY: &str = include_str!("../graphql/add_basket_item.graphql");

/// Create-payment-plan query.
pub const CREATE_PAYMENT_PLAN_QUERY: &str = include_str!("../graphql/create_payment_plan.graphql");

/// Execute-payment-plan mutation.
pub const EXECUTE_PAYMENT_PLAN_QUERY: &str =
    include_str!("../graphql/execute_payment_plan.graphql");

/// Delivery coordinates sent with basket calls.
pub const DELIVERY_LAT: f64 = 25.109_987_867_031_84;
/// Delivery coordinates sent with basket calls.
pub const DELIVERY_LON: f64 = 55.203_825_496_137_14;

// ============================================================================
// Request Envelope
// ============================================================================

/// A GraphQL POST body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    /// Operation name, when the endpoint expects one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'static str>,
    /// Query document.
    pub query: &'static str,
    /// Variables object.
    pub variables: Value,
}

// ============================================================================
// Basket Options
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct DeliveryTime {
    day: &'static str,
    time: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct Location {
    lat: f64,
    lon: f64,
}

/// `options` variable shared by basket calls: ASAP delivery to a fixed point.
#[derive(Debug, Clone, Serialize)]
pub struct BasketOptions<'a> {
    fulfillment_method: &'static str,
    delivery_time: DeliveryTime,
    location: Location,
    branch_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    force_new: Option<bool>,
}

impl<'a> BasketOptions<'a> {
    /// Creates options for the given restaurant branch.
    pub fn new(branch_id: &'a str) -> Self {
        Self {
            fulfillment_method: "DELIVERY",
            delivery_time: DeliveryTime {
                day: "TODAY",
                time: "ASAP",
            },
            location: Location {
                lat: DELIVERY_LAT,
                lon: DELIVERY_LON,
            },
            branch_id,
            force_new: None,
        }
    }

    /// Sets the `force_new` basket flag.
    pub fn force_new(mut self, force_new: bool) -> Self {
        self.force_new = Some(force_new);
        self
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builds the clear-basket body.
pub fn clear_basket(branch_id: &str) -> GraphqlRequest {
    GraphqlRequest {
        operation_name: None,
        query: CLEAR_BASKET_QUERY,
        variables: json!({ "options": BasketOptions::new(branch_id) }),
    }
}

/// Builds the add-basket-item body.
pub fn add_basket_item(branch_id: &str, item: &Item, force_new: bool) -> GraphqlRequest {
    GraphqlRequest {
        operation_name: Some("AddBasketItem"),
        query: ADD_BASKET_ITEM_QUERY,
        variables: json!({
            "capabilities": {
                "ui_action_types": ["CHANGE_ADDRESS", "GO_TO_PLUS_SIGN_UP"],
                "ui_list_components": ["UI_CHARITY_DONATION_OPTIONS"],
                "ui_icons": ["COOP_LOGO"]
            },
            "clientConfig": { "use_accessible_layout": false },
            "options": BasketOptions::new(branch_id).force_new(force_new),
            "item": item,
            "skipUI": false
        }),
    }
}

/// Builds the create-payment-plan body.
pub fn create_payment_plan(checkout_id: &str) -> GraphqlRequest {
    GraphqlRequest {
        operation_name: Some("create_payment_plan"),
        query: CREATE_PAYMENT_PLAN_QUERY,
        variables: json!({
            "capabilities": {
                "wallets": [{ "is_configured": false, "type": "APPLE_PAY" }],
                "payment_capabilities": [
                    "RETURN_PAYPAL_PAYMENT_OPTIONS",
                    "PAYPAL_UPSELL",
                    "RETURN_PAYMENT_TOKEN_TYPE",
                    "RETURN_IDEAL",
                    "PAYMENT_TOKEN_UPSELL",
                    "SHOW_CORPORATE_MEAL_PROGRAM_ALLOWANCE_OPTION"
                ],
                "ui_blocks_capabilities": [
                    "TERMS_AND_CONDITIONS_SECTION",
                    "PAYMENT_SECTION",
                    "LOYALTY_CARD_SECTION",
                    "VOUCHERS",
                    "FULFILLMENT_DETAILS_SECTION"
                ]
            },
            "payment_limitations": [],
            "client_event": "INITIAL_PLAN_LOAD",
            "params": [],
            "checkout_id": checkout_id
        }),
    }
}

/// Builds the execute-payment-plan body.
pub fn execute_payment_plan(payment_plan_id: &str, checkout_id: &str) -> GraphqlRequest {
    GraphqlRequest {
        operation_name: Some("execute_payment_plan"),
        query: EXECUTE_PAYMENT_PLAN_QUERY,
        variables: json!({
            "payment_plan_id": payment_plan_id,
            "params": [],
            "checkout_id": checkout_id,
            "marketing_preference_results": { "results": [] }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_basket_has_no_force_new() {
        let body = serde_json::to_value(clear_basket("branch-9")).unwrap();
        let options = &body["variables"]["options"];
        assert_eq!(options["branch_id"], "branch-9");
        assert_eq!(options["delivery_time"]["time"], "ASAP");
        assert!(options.get("force_new").is_none());
        assert!(body.get("operation_name").is_none());
    }

    #[test]
    fn test_add_item_carries_item_and_flag() {
        let item = Item::from_value(json!({ "menu_item_drn_id": "m-1", "quantity": 1 })).unwrap();
        let body = serde_json::to_value(add_basket_item("b", &item, true)).unwrap();

        assert_eq!(body["operation_name"], "AddBasketItem");
        assert_eq!(body["variables"]["item"]["menu_item_drn_id"], "m-1");
        assert_eq!(body["variables"]["options"]["force_new"], true);
        assert_eq!(body["variables"]["skipUI"], false);
        assert!(body["query"].as_str().unwrap().contains("add_basket_item"));
    }

    #[test]
    fn test_checkout_bodies_carry_checkout_id() {
        let create = serde_json::to_value(create_payment_plan("chk")).unwrap();
        assert_eq!(create["variables"]["checkout_id"], "chk");
        assert_eq!(create["variables"]["client_event"], "INITIAL_PLAN_LOAD");

        let execute = serde_json::to_value(execute_payment_plan("plan", "chk")).unwrap();
        assert_eq!(execute["variables"]["payment_plan_id"], "plan");
        assert_eq!(execute["variables"]["checkout_id"], "chk");
    }
}
