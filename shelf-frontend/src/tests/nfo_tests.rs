use super::*;
use serde_json::json;

#[test]
fn test_escaped_text() {
    let mut doc = NfoDocument::new("movie");
    doc.tag("title", "Tom & Jerry <3");
    let xml = doc.finish();
    assert!(xml.contains("  <title>Tom &amp; Jerry &lt;3</title>\n"));
    assert!(xml.starts_with("<?xml"));
    assert!(xml.ends_with("</movie>\n"));
}

#[test]
fn test_opt_tag_skips_blank() {
    let mut doc = NfoDocument::new("movie");
    doc.opt_tag("tagline", "  ").tags("genre", &["a", "", "b"]);
    let xml = doc.finish();
    assert!(!xml.contains("tagline"));
    assert_eq!(xml.matches("<genre>").count(), 2);
}

#[test]
fn test_actor_block_and_attrs() {
    let mut doc = NfoDocument::new("movie");
    doc.actor("Mai", "Model")
        .tag_with_attrs("uniqueid", &[("type", "code"), ("default", "true")], "BB-001");
    let xml = doc.finish();
    assert!(xml.contains("  <actor>\n    <name>Mai</name>\n    <role>Model</role>\n  </actor>\n"));
    assert!(xml.contains("<uniqueid type=\"code\" default=\"true\">BB-001</uniqueid>"));
}

#[test]
fn test_text_values() {
    assert_eq!(text_values(&json!("x")), vec!["x"]);
    assert_eq!(text_values(&json!(42)), vec!["42"]);
    assert_eq!(text_values(&json!(["a", 1])), vec!["a", "1"]);
    assert!(text_values(&json!({"k": "v"})).is_empty());
}
