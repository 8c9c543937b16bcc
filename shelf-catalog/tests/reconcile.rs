use serde_json::json;
use shelf_catalog::{
    MatchMethod, MediaKind, Record, RecordStore, ReconcileOptions, apply_fields, merge, new_record,
    reconcile_stores,
};

fn record(value: serde_json::Value) -> Record {
    Record::from_value(value).unwrap()
}

#[test]
fn merge_concatenates_lists_in_order() {
    let a = record(json!({"keywords": ["x"]}));
    let b = record(json!({"keywords": ["y"]}));
    assert_eq!(merge(&a, &b).get("keywords"), Some(&json!(["x", "y"])));
}

#[test]
fn merge_does_not_dedup() {
    let a = record(json!({"model": ["Mai"]}));
    let b = record(json!({"model": ["Mai"]}));
    assert_eq!(merge(&a, &b).get_list("model"), vec!["Mai", "Mai"]);
}

#[test]
fn merge_addition_wins_even_when_empty() {
    let a = record(json!({"title": "Foo"}));
    let b = record(json!({"title": ""}));
    assert_eq!(merge(&a, &b).get_str("title"), "");
}

#[test]
fn merge_leaves_base_untouched() {
    let a = record(json!({"keywords": ["x"], "title": "Foo", "series": "S"}));
    let b = record(json!({"keywords": ["y"], "title": "Bar"}));
    let merged = merge(&a, &b);

    assert_eq!(a.get("keywords"), Some(&json!(["x"])));
    assert_eq!(a.get_str("title"), "Foo");
    assert_eq!(merged.get_str("series"), "S");
    assert_eq!(merged.get_str("title"), "Bar");
}

#[test]
fn merge_list_against_scalar_overwrites() {
    let a = record(json!({"imgs": {"1.jpg": "/a"}}));
    let b = record(json!({"imgs": {"2.jpg": "/b"}}));
    assert_eq!(merge(&a, &b).get("imgs"), Some(&json!({"2.jpg": "/b"})));
}

#[test]
fn apply_fields_overwrites_then_overrides() {
    let original = new_record(MediaKind::Video);
    let addition = record(json!({
        "title": "Demo",
        "keywords": ["k1"],
        "studio": ["FS"],
        "unknown": 1,
    }));
    let overrides = record(json!({"studio": ["Override"]}));

    let applied = apply_fields(&original, &addition, &overrides);
    assert_eq!(applied.get_str("title"), "Demo");
    assert_eq!(applied.get_list("studio"), vec!["Override"]);
    assert_eq!(applied.get("unknown"), Some(&json!(1)));
    // template fields not mentioned stay at their defaults
    assert_eq!(applied.get_str("path"), "");
    assert_eq!(original.get_str("title"), "");
}

#[test]
fn apply_fields_never_concatenates() {
    let original = record(json!({"keywords": ["a"]}));
    let addition = record(json!({"keywords": ["b"]}));
    let applied = apply_fields(&original, &addition, &Record::new());
    assert_eq!(applied.get_list("keywords"), vec!["b"]);
}

fn store(entries: serde_json::Value) -> RecordStore {
    RecordStore::from_json_str(&entries.to_string(), "test").unwrap()
}

#[test]
fn reconcile_matches_in_priority_order() {
    let mut base = store(json!({
        "Mai-Demo": {"title": "Demo", "code": "BB-001", "keywords": ["fs"]},
        "Mai-Rope Work #3": {"title": "Rope Work #3", "keywords": ["fs"]},
        "Rin-Beach Day": {"title": "Beach Day", "keywords": ["fs"]},
        "Yui-Garden  Party": {"title": "Garden Party", "keywords": ["fs"]},
    }));
    let additions = store(json!({
        "Anything": {"code": "bb-001", "keywords": ["web"]},
        "Rin-Beach Day": {"description": "sun", "keywords": ["web"]},
        "yui - garden party": {"keywords": ["web"]},
        "Mai-Rope Work #4": {"keywords": ["web"]},
        "Nobody-Else": {"keywords": ["web"]},
    }));

    let report = reconcile_stores(&mut base, &additions, &ReconcileOptions::default());

    assert_eq!(report.count_by(MatchMethod::Code), 1);
    assert_eq!(report.count_by(MatchMethod::Exact), 1);
    assert_eq!(report.count_by(MatchMethod::Normalized), 1);
    assert_eq!(report.count_by(MatchMethod::Fallback), 1);
    assert_eq!(report.unmatched, vec!["Nobody-Else".to_string()]);
    assert!(report.inserted.is_empty());

    assert_eq!(base.len(), 4);
    assert_eq!(base.get("Mai-Demo").unwrap().get_list("keywords"), vec!["fs", "web"]);
    assert_eq!(base.get("Rin-Beach Day").unwrap().get_str("description"), "sun");
    assert_eq!(
        base.get("Yui-Garden  Party").unwrap().get_list("keywords"),
        vec!["fs", "web"]
    );
    assert_eq!(
        base.get("Mai-Rope Work #3").unwrap().get_list("keywords"),
        vec!["fs", "web"]
    );
}

#[test]
fn reconcile_inserts_unmatched_on_request() {
    let mut base = store(json!({"Mai-Demo": {"title": "Demo"}}));
    let additions = store(json!({"Rin-Other": {"title": "Other"}}));
    let options = ReconcileOptions {
        insert_unmatched: true,
    };

    let report = reconcile_stores(&mut base, &additions, &options);
    assert_eq!(report.inserted, vec!["Rin-Other".to_string()]);
    assert!(base.contains_key("Rin-Other"));
    assert!(report.collisions.is_empty());
}

#[test]
fn fallback_picks_first_candidate_in_key_order() {
    let mut base = store(json!({
        "Mai-Set #2": {"keywords": []},
        "Mai-Set #1": {"keywords": []},
    }));
    let additions = store(json!({"Mai-Set #9": {"keywords": ["new"]}}));

    let report = reconcile_stores(&mut base, &additions, &ReconcileOptions::default());
    assert_eq!(report.matched[0].base_key, "Mai-Set #1");
    assert_eq!(report.matched[0].method, MatchMethod::Fallback);
}
