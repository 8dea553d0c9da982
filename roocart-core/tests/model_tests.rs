//! Integration tests for the core run-state types.

use roocart_core::{BasketSnapshot, Item, ItemQueue, PaymentPlan, Phase, Session};
use serde_json::json;

fn items() -> Vec<Item> {
    serde_json::from_value::<Vec<Item>>(json!([
        { "menu_item_drn_id": "x", "quantity": 1 },
        { "menu_item_drn_id": "y", "quantity": 2 }
    ]))
    .unwrap()
}

#[test]
fn test_items_deserialize_from_list() {
    let items = items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].id(), "y");
    assert_eq!(items[1].fields()["quantity"], 2);
}

#[test]
fn test_queue_drains_against_snapshot() {
    let mut queue: ItemQueue = items().into_iter().collect();
    let snapshot = BasketSnapshot::new(["x"]);

    let mut confirmed = Vec::new();
    for _ in 0..queue.len() {
        let item = queue.dequeue().unwrap();
        if snapshot.contains(item.id()) {
            confirmed.push(item.id().to_string());
        } else {
            queue.enqueue(item);
        }
    }

    assert_eq!(confirmed, vec!["x"]);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.iter().next().unwrap().id(), "y");
}

#[test]
fn test_session_plan_is_idempotent() {
    let mut session = Session::new();
    assert_eq!(Phase::initial(false), Phase::ClearBasket);
    assert!(session.set_payment_plan(PaymentPlan::new("p1")));
    assert!(!session.set_payment_plan(PaymentPlan::new("p2")));
    assert_eq!(session.payment_plan().map(|p| p.id.as_str()), Some("p1"));
}
