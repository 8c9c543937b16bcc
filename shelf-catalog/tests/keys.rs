use serde_json::json;
use shelf_catalog::image_order::{SortKeyError, image_sort_key, order_by_sort_key};
use shelf_catalog::{FuzzyIndex, MatchMethod, MediaKind, Record, display_key, normalize_title};

fn video(models: serde_json::Value, title: &str) -> Record {
    Record::new().with("model", models).with("title", title)
}

#[test]
fn display_key_prefixes() {
    assert!(display_key(&video(json!([]), "T"), MediaKind::Video).starts_with("Unknown-"));
    assert!(display_key(&video(json!(["Mai"]), "T"), MediaKind::Video).starts_with("Mai-"));
    assert!(display_key(&video(json!(["A", "B"]), "T"), MediaKind::Album).starts_with("A, B-"));
    assert_eq!(display_key(&video(json!(["B", "A"]), "T"), MediaKind::Video), "B, A-T");
}

#[test]
fn model_records_key_by_name() {
    let record = Record::new().with("name", "Mai").with("title", "ignored");
    assert_eq!(display_key(&record, MediaKind::Model), "Mai");
}

#[test]
fn normalization_steps() {
    assert_eq!(normalize_title("  Beach   Day "), "beach day");
    assert_eq!(normalize_title("Mai-Demo"), "mai - demo");
    assert_eq!(normalize_title("Mai  -   Demo"), "mai - demo");
    assert_eq!(normalize_title("Set#2"), "set #2");
    assert_eq!(normalize_title("Set  #  2"), "set #2");
    assert_eq!(normalize_title("Mai\u{2019}s Day"), "mai's day");
    assert_eq!(normalize_title("\u{201C}Quoted\u{201D}"), "\"quoted\"");
    assert_eq!(normalize_title("Zero\u{200B}Width"), "zerowidth");
    // full-width forms decompose to ASCII
    assert_eq!(normalize_title("ＡＢＣ＃１"), "abc #1");
}

#[test]
fn differently_formatted_titles_collide() {
    assert_eq!(
        normalize_title("Mai-Rope Work #3"),
        normalize_title("mai -  rope   work#3")
    );
}

#[test]
fn fuzzy_index_prefers_normalized_match() {
    let keys = ["Mai-Set #1", "Mai-Set #10", "mai - set #10"];
    let index = FuzzyIndex::new(keys);
    // "mai - set #10" and "Mai-Set #10" normalize the same; the first in key order wins
    assert_eq!(index.find("MAI-SET #10"), Some(("Mai-Set #10", MatchMethod::Normalized)));
    assert_eq!(index.find("Mai-Set #7"), Some(("Mai-Set #1", MatchMethod::Fallback)));
    assert_eq!(index.find("#7"), None);
    assert_eq!(index.find("Rin-Other"), None);
}

#[test]
fn sort_key_priority() {
    assert_eq!(image_sort_key("IMG(7).png"), Ok(7));
    assert_eq!(image_sort_key("12.png"), Ok(12));
    assert_eq!(image_sort_key("DSC00045.png"), Ok(45));
    assert_eq!(
        image_sort_key("cover.png"),
        Err(SortKeyError::Unrecognized("cover.png".into()))
    );
}

#[test]
fn parenthesized_number_beats_leading_digits() {
    assert_eq!(image_sort_key("2024 shoot (3).jpg"), Ok(3));
    assert_eq!(image_sort_key("shoot（12）.jpg"), Ok(12));
}

#[test]
fn extension_digits_are_ignored() {
    assert!(image_sort_key("cover.mp4").is_err());
}

#[test]
fn huge_numbers_overflow() {
    assert!(matches!(
        image_sort_key("123456789012345678901234567890.jpg"),
        Err(SortKeyError::Overflow(_))
    ));
}

#[test]
fn ordering_drops_unrecognized_and_breaks_ties_by_name() {
    let items = vec![
        ("c3.jpg".to_string(), 'c'),
        ("cover.jpg".to_string(), 'x'),
        ("a1.jpg".to_string(), 'a'),
        ("b(1).jpg".to_string(), 'b'),
    ];
    let (ordered, rejected) = order_by_sort_key(items);

    let names: Vec<_> = ordered.iter().map(|(_, n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["a1.jpg", "b(1).jpg", "c3.jpg"]);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].0, "cover.jpg");
}
