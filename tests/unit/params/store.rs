use super::*;
use serde_json::json;

#[test]
fn starts_at_default_selection() {
    let store = ParameterStore::default();
    assert_eq!(store.selected(), DEFAULT_SELECTED);
    assert_eq!(store.state(), StoreState::Default);
    assert_eq!(store.background().name, "Red Cityscape");
}

#[test]
fn custom_default_is_clamped() {
    let store = ParameterStore::with_default(BackgroundCatalog::template(), 99);
    assert_eq!(store.selected(), 11);
}

#[test]
fn load_json_adopts_selected_and_extra_fields() {
    let mut store = ParameterStore::default();
    store
        .load_json(br#"{"selected": 9, "palette": "dusk", "density": 0.5}"#)
        .unwrap();
    assert_eq!(store.selected(), 9);
    assert_eq!(store.state(), StoreState::Loaded);
    assert_eq!(store.config().extra["palette"], json!("dusk"));
    assert_eq!(store.config().extra["density"], json!(0.5));
}

#[test]
fn load_failure_keeps_previous_configuration() {
    let mut store = ParameterStore::default();
    store.set_selected(2);
    assert!(store.load_json(b"not json").is_err());
    assert!(store.load_json(b"[1,2,3]").is_err());
    assert_eq!(store.selected(), 2);
    assert_eq!(store.state(), StoreState::Default);
}

#[test]
fn out_of_range_selected_is_clamped_on_restore() {
    let mut store = ParameterStore::default();
    assert_eq!(
        store.restore(Some(&json!({ "selected": -1 }))),
        RestoreOutcome::Adopted
    );
    assert_eq!(store.selected(), 0);

    store.restore(Some(&json!({ "selected": 12 })));
    assert_eq!(store.selected(), 11);

    store.restore(Some(&json!({ "selected": 18446744073709551615u64 })));
    assert_eq!(store.selected(), 11);

    store.restore(Some(&json!({ "selected": 3.7 })));
    assert_eq!(store.selected(), 3);
    // Reading the background never panics.
    assert!(!store.background().name.is_empty());
}

#[test]
fn missing_or_bogus_selected_falls_back_to_default() {
    let mut store = ParameterStore::default();
    store.restore(Some(&json!({ "selected": "seven" })));
    assert_eq!(store.selected(), DEFAULT_SELECTED);
    store.set_selected(1);
    store.restore(Some(&json!({ "other": true })));
    assert_eq!(store.selected(), DEFAULT_SELECTED);
    assert_eq!(store.config().extra["other"], json!(true));
}

#[test]
fn restore_without_data_keeps_state() {
    let mut store = ParameterStore::default();
    store.set_selected(6);
    assert_eq!(store.restore(None), RestoreOutcome::Fresh);
    assert_eq!(store.selected(), 6);
    assert_eq!(
        store.restore(Some(&json!("garbage"))),
        RestoreOutcome::Rejected
    );
    assert_eq!(store.selected(), 6);
}

#[test]
fn save_then_restore_round_trips() {
    let mut store = ParameterStore::default();
    store.set_selected(8);
    store.set_field("palette", json!(["#fff", "#000"])).unwrap();
    store.set_field("seed_offset", json!(12)).unwrap();
    let saved = serde_json::to_value(store.config()).unwrap();

    let mut other = ParameterStore::default();
    assert_eq!(other.restore(Some(&saved)), RestoreOutcome::Adopted);
    assert_eq!(other.config(), store.config());
}

#[test]
fn set_field_routes_selected_through_clamp() {
    let mut store = ParameterStore::default();
    store.set_field("selected", json!(40)).unwrap();
    assert_eq!(store.selected(), 11);
    assert!(store.set_field("selected", json!(null)).is_err());
    assert_eq!(store.selected(), 11);
}

#[test]
fn attributes_follow_selection() {
    let mut store = ParameterStore::default();
    store.set_selected(10);
    assert_eq!(
        store.attributes(),
        vec![Attribute {
            trait_type: "Background".to_string(),
            value: "Waterfall of Light".to_string(),
        }]
    );
}

#[test]
fn configuration_serializes_flat() {
    let mut cfg = Configuration::with_selected(3);
    cfg.extra.insert("mood".to_string(), json!("calm"));
    assert_eq!(
        serde_json::to_value(&cfg).unwrap(),
        json!({ "selected": 3, "mood": "calm" })
    );
}
