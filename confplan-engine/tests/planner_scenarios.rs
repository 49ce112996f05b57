use std::sync::Arc;

use confplan_engine::constants::{AUDITORIUM_CAP, VENUE_ROOM_CAP};
use confplan_engine::{
    Catalog, CatalogError, CartAction, CartStore, Category, EffectiveQuantity, EstimateSummary,
    QuantityChange, meals_cost, project, total_cost,
};

const FIXTURE_CATALOG: &str = r#"{
    "items": [
        { "id": "auditorium", "name": "Auditorium Hall (Capacity:200)", "cost_cents": 5500, "category": "venue" },
        { "id": "breakout", "name": "Breakout Room", "cost_cents": 700, "category": "venue" },
        { "id": "mic-wired", "name": "Microphones", "cost_cents": 45, "category": "addon" },
        { "id": "mic-wireless", "name": "Microphones", "cost_cents": 45, "category": "addon" },
        { "id": "projector", "name": "Projectors", "cost_cents": 200, "category": "addon" },
        { "id": "buffet", "name": "Buffet", "cost_cents": 15, "category": "meal", "per_person": true },
        { "id": "snacks", "name": "Snack Table", "cost_cents": 20, "category": "meal", "per_person": true },
        { "id": "cake", "name": "Celebration Cake", "cost_cents": 90, "category": "meal" }
    ]
}"#;

fn fixture_store() -> CartStore {
    let catalog = Catalog::from_json(FIXTURE_CATALOG).expect("fixture catalog");
    CartStore::new(Arc::new(catalog))
}

#[test]
fn auditorium_fills_after_three_bookings() {
    let mut store = fixture_store();
    for _ in 0..3 {
        assert!(store.increment_venue("auditorium").unwrap().is_applied());
    }
    assert_eq!(store.quantity_of("auditorium"), 3);
    let before = store.state().clone();
    assert_eq!(
        store.increment_venue("auditorium").unwrap(),
        QuantityChange::AtCap { cap: 3 }
    );
    assert_eq!(store.state(), &before);
    assert_eq!(store.remaining_auditorium_capacity(), 0);
}

#[test]
fn venue_caps_hold_under_repeated_bookings() {
    let mut store = fixture_store();
    for _ in 0..60 {
        store.increment_venue("breakout").unwrap();
    }
    for _ in 0..6 {
        store.increment_venue("auditorium").unwrap();
    }
    assert_eq!(store.quantity_of("breakout"), VENUE_ROOM_CAP);
    assert_eq!(store.quantity_of("auditorium"), AUDITORIUM_CAP);
    assert_eq!(store.remaining_auditorium_capacity(), 0);
}

#[test]
fn catalog_cannot_raise_venue_caps() {
    let oversized = r#"{
        "items": [
            { "id": "auditorium", "name": "Hall", "cost_cents": 5500, "category": "venue", "max_qty": 5 },
            { "id": "room", "name": "Room", "cost_cents": 700, "category": "venue", "max_qty": 50 }
        ]
    }"#;
    let err = Catalog::from_json(oversized).unwrap_err();
    assert!(matches!(err, CatalogError::CapOverride { .. }));

    let room_only = r#"{
        "items": [
            { "id": "room", "name": "Room", "cost_cents": 700, "category": "venue", "max_qty": 50 }
        ]
    }"#;
    assert!(matches!(
        Catalog::from_json(room_only),
        Err(CatalogError::CapOverride { max_qty: 50, cap: VENUE_ROOM_CAP, .. })
    ));
}

#[test]
fn buffet_priced_per_person() {
    let mut store = fixture_store();
    store.toggle_meal("buffet").unwrap();
    store.set_number_of_people(4).unwrap();

    assert_eq!(meals_cost(store.state()), 60);
    let items = project(store.state()).to_vec();
    assert_eq!(items.len(), 1);
    let buffet = &items[0];
    assert_eq!(buffet.category, Category::Meal);
    assert_eq!(buffet.effective_quantity, EffectiveQuantity::ForPeople(4));
    assert_eq!(buffet.effective_quantity.to_string(), "for 4 people");
    assert_eq!(buffet.subtotal_cents, 60);
}

#[test]
fn attendee_change_only_moves_meal_cost() {
    let mut store = fixture_store();
    store.increment_venue("breakout").unwrap();
    store.increment_addon("projector").unwrap();
    store.toggle_meal("snacks").unwrap();
    store.set_number_of_people(2).unwrap();
    let before = total_cost(store.state());
    assert_eq!(before.meals, 40);

    store.set_number_of_people(5).unwrap();
    let after = total_cost(store.state());
    assert_eq!(after.meals, 100);
    assert_eq!(after.venue, before.venue);
    assert_eq!(after.addons, before.addons);
    assert_eq!(after.total, before.total + 60);
}

#[test]
fn flat_meal_ignores_attendees() {
    let mut store = fixture_store();
    store.toggle_meal("cake").unwrap();
    store.set_number_of_people(50).unwrap();
    let items = project(store.state()).to_vec();
    assert_eq!(items[0].effective_quantity, EffectiveQuantity::Units(1));
    assert_eq!(items[0].subtotal_cents, 90);
}

#[test]
fn duplicate_addon_names_project_once() {
    let mut store = fixture_store();
    store.increment_addon("mic-wired").unwrap();
    store.increment_addon("mic-wireless").unwrap();

    let projection = project(store.state());
    let mics: Vec<_> = projection
        .iter()
        .filter(|item| item.name == "Microphones")
        .collect();
    assert_eq!(mics.len(), 1);
    assert_eq!(mics[0].effective_quantity, EffectiveQuantity::Units(2));
    assert_eq!(projection.subtotal_sum(), total_cost(store.state()).total);
}

#[test]
fn toggling_off_drops_meal_from_projection() {
    let mut store = fixture_store();
    store.toggle_meal("buffet").unwrap();
    store.set_number_of_people(9).unwrap();
    store.toggle_meal("buffet").unwrap();
    assert_eq!(meals_cost(store.state()), 0);
    assert!(project(store.state()).is_empty());
}

#[test]
fn scripted_session_produces_summary() {
    let script = CartAction::script_from_json(
        r#"[
            {"action": "increment_venue", "item_id": "breakout"},
            {"action": "increment_venue", "item_id": "breakout"},
            {"action": "increment_addon", "item_id": "projector"},
            {"action": "toggle_meal", "item_id": "buffet"},
            {"action": "set_number_of_people", "people": 10}
        ]"#,
    )
    .unwrap();
    let mut store = fixture_store();
    let outcomes = store.apply_all(&script).unwrap();
    assert_eq!(outcomes.len(), 5);

    let summary = EstimateSummary::capture(store.state());
    assert_eq!(summary.breakdown.venue, 1_400);
    assert_eq!(summary.breakdown.addons, 200);
    assert_eq!(summary.breakdown.meals, 150);
    assert_eq!(summary.breakdown.total, 1_750);
    let names: Vec<&str> = summary.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Breakout Room", "Projectors", "Buffet"]);
}
