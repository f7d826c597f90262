use proptest::prelude::*;
use serde_json::json;
use vizivault_model::{Attribute, AttributeDiffSet, AttributeEntry, ModelError};

fn values(entry: AttributeEntry<'_>) -> Vec<serde_json::Value> {
    entry.into_vec().into_iter().map(|a| a.value.clone()).collect()
}

// ── add / get ────────────────────────────────────────────────────

#[test]
fn new_set_is_empty() {
    let set = AttributeDiffSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert!(!set.has_pending_changes());
}

#[test]
fn get_unknown_key_returns_none() {
    let set = AttributeDiffSet::new();
    assert!(set.get("missing").is_none());
}

#[test]
fn first_add_is_singular() {
    let mut set = AttributeDiffSet::new();
    set.add_value("name", "Alice").unwrap();

    match set.get("name") {
        Some(AttributeEntry::One(attribute)) => assert_eq!(attribute.value, json!("Alice")),
        other => panic!("expected singular entry, got {other:?}"),
    }
}

#[test]
fn second_add_promotes_to_repeated_in_order() {
    let mut set = AttributeDiffSet::new();
    set.add_value("phone", "v1").unwrap();
    set.add_value("phone", "v2").unwrap();

    let entry = set.get("phone").unwrap();
    assert!(entry.is_repeated());
    assert_eq!(values(entry), vec![json!("v1"), json!("v2")]);
}

#[test]
fn third_add_appends() {
    let mut set = AttributeDiffSet::new();
    set.add_value("phone", "v1").unwrap();
    set.add_value("phone", "v2").unwrap();
    set.add_value("phone", "v3").unwrap();

    assert_eq!(
        values(set.get("phone").unwrap()),
        vec![json!("v1"), json!("v2"), json!("v3")]
    );
}

#[test]
fn add_rejects_empty_key() {
    let mut set = AttributeDiffSet::new();
    let err = set.add_value("", "x").unwrap_err();
    assert!(matches!(err, ModelError::InvalidArgument(_)));
    assert!(set.is_empty());
}

#[test]
fn add_records_pending_change() {
    let mut set = AttributeDiffSet::new();
    set.add_value("name", "Alice").unwrap();
    assert_eq!(set.changed_attributes().len(), 1);
    assert!(set.has_pending_changes());
}

#[test]
fn insert_persisted_does_not_record_change() {
    let mut set = AttributeDiffSet::new();
    set.insert_persisted(Attribute::new("name", "Alice").unwrap())
        .unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.changed_attributes().is_empty());
}

#[test]
fn value_equal_attributes_are_tracked_separately() {
    let mut set = AttributeDiffSet::new();
    let attribute = Attribute::new("email", "a@example.com").unwrap();
    let first = set.add(attribute.clone()).unwrap();
    let second = set.add(attribute).unwrap();

    assert_ne!(first, second);
    assert_eq!(set.changed_attributes().len(), 2);
    assert_eq!(set.get("email").unwrap().len(), 2);
}

#[test]
fn get_by_handle_returns_added_attribute() {
    let mut set = AttributeDiffSet::new();
    let handle = set.add_value("city", "Berlin").unwrap();
    assert_eq!(set.get_by_handle(handle).unwrap().value, json!("Berlin"));
}

// ── get_all ──────────────────────────────────────────────────────

#[test]
fn get_all_lists_singulars_then_repeated_groups() {
    let mut set = AttributeDiffSet::new();
    set.add_value("phone", "p1").unwrap();
    set.add_value("name", "Alice").unwrap();
    set.add_value("phone", "p2").unwrap();
    set.add_value("city", "Berlin").unwrap();

    let all: Vec<_> = set.get_all().into_iter().map(|a| a.value.clone()).collect();
    assert_eq!(
        all,
        vec![json!("Alice"), json!("Berlin"), json!("p1"), json!("p2")]
    );
}

// ── clear ────────────────────────────────────────────────────────

#[test]
fn clear_unknown_key_is_not_found() {
    let mut set = AttributeDiffSet::new();
    let err = set.clear("X").unwrap_err();
    assert_eq!(err, ModelError::NotFound("X".to_string()));
    assert!(set.deleted_keys().is_empty());
}

#[test]
fn clear_singular_removes_and_records_deletion() {
    let mut set = AttributeDiffSet::new();
    set.insert_persisted(Attribute::new("name", "Alice").unwrap())
        .unwrap();

    set.clear("name").unwrap();
    assert!(set.get("name").is_none());
    assert!(!set.contains_key("name"));
    assert_eq!(set.deleted_keys(), ["name".to_string()]);
}

#[test]
fn clear_repeated_removes_every_value() {
    let mut set = AttributeDiffSet::new();
    set.add_value("phone", "p1").unwrap();
    set.add_value("phone", "p2").unwrap();

    set.clear("phone").unwrap();
    assert!(set.get("phone").is_none());
    assert!(set.is_empty());
    assert_eq!(set.deleted_keys(), ["phone".to_string()]);
}

#[test]
fn clear_drops_unsaved_values_from_changed_set() {
    let mut set = AttributeDiffSet::new();
    set.add_value("name", "Alice").unwrap();
    set.add_value("city", "Berlin").unwrap();

    set.clear("name").unwrap();
    let changed: Vec<_> = set.changed_attributes().iter().map(|a| a.key().to_string()).collect();
    assert_eq!(changed, vec!["city".to_string()]);
}

#[test]
fn clear_twice_fails_the_second_time() {
    let mut set = AttributeDiffSet::new();
    set.add_value("name", "Alice").unwrap();
    set.clear("name").unwrap();
    assert!(matches!(set.clear("name"), Err(ModelError::NotFound(_))));
    assert_eq!(set.deleted_keys().len(), 1);
}

#[test]
fn readding_cleared_key_keeps_remote_delete() {
    let mut set = AttributeDiffSet::new();
    set.insert_persisted(Attribute::new("name", "Alice").unwrap())
        .unwrap();
    set.clear("name").unwrap();

    set.add_value("name", "Bob").unwrap();
    assert!(set.deleted_keys().is_empty());
    assert_eq!(set.replaced_keys(), ["name".to_string()]);
    assert_eq!(set.pending_deletes(), vec!["name".to_string()]);
    assert!(set.has_pending_changes());
    assert_eq!(set.get("name").unwrap().as_one().unwrap().value, json!("Bob"));
}

#[test]
fn pending_deletes_list_cleared_before_replaced() {
    let mut set = AttributeDiffSet::new();
    set.insert_persisted(Attribute::new("a", 1).unwrap()).unwrap();
    set.insert_persisted(Attribute::new("b", 2).unwrap()).unwrap();
    set.clear("a").unwrap();
    set.clear("b").unwrap();
    set.add_value("a", 3).unwrap();

    assert_eq!(set.pending_deletes(), vec!["b".to_string(), "a".to_string()]);
}

#[test]
fn commit_deleted_settles_replaced_key() {
    let mut set = AttributeDiffSet::new();
    set.insert_persisted(Attribute::new("name", "Alice").unwrap())
        .unwrap();
    set.clear("name").unwrap();
    set.add_value("name", "Bob").unwrap();

    set.commit_deleted("name");
    assert!(set.pending_deletes().is_empty());
    assert_eq!(set.changed_attributes().len(), 1);
}

// ── repeated promotion is monotonic ──────────────────────────────

#[test]
fn promoted_key_stays_repeated_after_clear_and_readd() {
    let mut set = AttributeDiffSet::new();
    set.add_value("phone", "p1").unwrap();
    set.add_value("phone", "p2").unwrap();
    set.clear("phone").unwrap();

    set.add_value("phone", "p3").unwrap();
    let entry = set.get("phone").unwrap();
    assert!(entry.is_repeated());
    assert_eq!(entry.len(), 1);
    assert!(entry.as_one().is_none());
}

// ── purge / commit ───────────────────────────────────────────────

#[test]
fn purge_clears_singular_and_repeated_values() {
    let mut set = AttributeDiffSet::new();
    set.add_value("name", "Alice").unwrap();
    set.add_value("phone", "p1").unwrap();
    set.add_value("phone", "p2").unwrap();
    set.insert_persisted(Attribute::new("city", "Berlin").unwrap())
        .unwrap();
    set.clear("city").unwrap();

    set.purge();
    assert!(set.is_empty());
    assert!(set.get("phone").is_none());
    assert!(set.get_all().is_empty());
    assert!(!set.has_pending_changes());
}

#[test]
fn commit_changed_keeps_live_view() {
    let mut set = AttributeDiffSet::new();
    set.add_value("name", "Alice").unwrap();
    set.commit_changed();

    assert!(set.changed_attributes().is_empty());
    assert!(set.get("name").is_some());
}

#[test]
fn commit_deleted_forgets_only_that_key() {
    let mut set = AttributeDiffSet::new();
    set.add_value("a", 1).unwrap();
    set.add_value("b", 2).unwrap();
    set.clear("a").unwrap();
    set.clear("b").unwrap();

    set.commit_deleted("a");
    assert_eq!(set.deleted_keys(), ["b".to_string()]);
}

// ── properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn repeated_values_keep_append_order(values in prop::collection::vec(any::<i64>(), 2..20)) {
        let mut set = AttributeDiffSet::new();
        for v in &values {
            set.add_value("k", *v).unwrap();
        }
        let got: Vec<i64> = set
            .get("k")
            .unwrap()
            .into_vec()
            .iter()
            .map(|a| a.value.as_i64().unwrap())
            .collect();
        prop_assert_eq!(got, values);
    }

    #[test]
    fn cleared_keys_stay_scheduled_for_delete(ops in prop::collection::vec((0u8..4, any::<bool>()), 1..40)) {
        let keys = ["a", "b", "c", "d"];
        let mut set = AttributeDiffSet::new();
        let mut cleared = std::collections::HashSet::new();
        for (k, add) in ops {
            let key = keys[k as usize];
            if add {
                set.add_value(key, "v").unwrap();
            } else if set.clear(key).is_ok() {
                cleared.insert(key);
            }
            for deleted in set.deleted_keys() {
                prop_assert!(set.get(deleted).is_none());
            }
            for replaced in set.replaced_keys() {
                prop_assert!(set.get(replaced).is_some());
            }
            let pending = set.pending_deletes();
            prop_assert_eq!(pending.len(), cleared.len());
            for key in &cleared {
                prop_assert!(pending.iter().any(|p| p == key));
            }
        }
    }

    #[test]
    fn changed_count_matches_live_count_without_persisted(adds in prop::collection::vec(0u8..3, 0..30)) {
        let mut set = AttributeDiffSet::new();
        for k in &adds {
            set.add_value(format!("key{k}"), "v").unwrap();
        }
        prop_assert_eq!(set.changed_attributes().len(), adds.len());
        prop_assert_eq!(set.get_all().len(), adds.len());
    }
}
