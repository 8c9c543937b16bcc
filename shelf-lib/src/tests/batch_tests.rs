use std::fs;

use shelf_catalog::{Record, new_record};
use shelf_frontend::MaterializeOptions;

use super::*;

fn video_store(media_dir: &Path) -> RecordStore {
    let source = media_dir.join("clip.mp4");
    fs::write(&source, b"video").unwrap();

    let mut store = RecordStore::new();
    store.insert(
        "Mai-Clip",
        new_record(MediaKind::Video)
            .with("title", "Clip")
            .with("code", "BB-001")
            .with("path", source.to_string_lossy().into_owned()),
    );
    store.insert(
        "Mai-Gone",
        new_record(MediaKind::Video)
            .with("title", "Gone")
            .with("code", "BB-002")
            .with("path", media_dir.join("gone.mp4").to_string_lossy().into_owned()),
    );
    store
}

#[test]
fn test_batch_continues_after_failed_entity() {
    let tmp = tempfile::tempdir().unwrap();
    let store = video_store(tmp.path());
    let out = tmp.path().join("library");
    let materializer = Materializer::new(MaterializeOptions::default());

    let mut events = Vec::new();
    let report = run_materialize(&store, MediaKind::Video, &out, &materializer, &mut |e| {
        events.push(e)
    })
    .unwrap();

    assert_eq!(report.summary.created, 1);
    assert_eq!(report.summary.failed, 1);
    let failed: Vec<&str> = report.failures().map(|e| e.key.as_str()).collect();
    assert_eq!(failed, vec!["Mai-Gone"]);
    assert!(out.join("BB-001 - Clip").join("BB-001.strm").is_file());
    assert!(!out.join("BB-002 - Gone").exists());

    // started, 2 x (started, finished), done
    assert_eq!(events.len(), 6);
    assert!(matches!(events[0], BatchEvent::Started { total: 2 }));
    assert!(matches!(events[5], BatchEvent::Done));
}

#[test]
fn test_second_run_skips() {
    let tmp = tempfile::tempdir().unwrap();
    let store = video_store(tmp.path());
    let out = tmp.path().join("library");
    let materializer = Materializer::new(MaterializeOptions::default());

    run_materialize(&store, MediaKind::Video, &out, &materializer, &mut |_| {}).unwrap();
    let again = run_materialize(&store, MediaKind::Video, &out, &materializer, &mut |_| {}).unwrap();

    assert_eq!(again.summary.skipped, 1);
    assert_eq!(again.summary.created, 0);
}

#[test]
fn test_unusable_output_root_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("file");
    fs::write(&blocker, b"").unwrap();
    let materializer = Materializer::new(MaterializeOptions::default());
    let mut called = false;

    let result = run_materialize(
        &RecordStore::new(),
        MediaKind::Video,
        &blocker.join("library"),
        &materializer,
        &mut |_| called = true,
    );

    assert!(matches!(result, Err(ShelfError::OutputRoot { .. })));
    assert!(!called);
}

#[test]
fn test_report_json() {
    let tmp = tempfile::tempdir().unwrap();
    let store = video_store(tmp.path());
    let materializer = Materializer::new(MaterializeOptions::default());
    let report = run_materialize(&store, MediaKind::Video, &tmp.path().join("out"), &materializer, &mut |_| {})
        .unwrap();

    let path = tmp.path().join("report.json");
    report.write_json(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["kind"], "video");
    assert_eq!(json["summary"]["failed"], 1);
    assert_eq!(json["entities"][1]["state"], "failed");
}

#[test]
fn test_check_completeness() {
    let mut store = RecordStore::new();
    store.insert("a", Record::new().with("name", "A"));
    let full = new_record(MediaKind::Model)
        .with("name", "B")
        .with("real_name", "b")
        .with("studio", "S")
        .with("ID", "1")
        .with("SNS", "@b")
        .with("description", "d")
        .with("comments", "c")
        .with("beauty_score", 1)
        .with("figure_score", 1)
        .with("leg_score", 1);
    store.insert("b", full);

    let incomplete = check_completeness(&store, MediaKind::Model);

    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].key, "a");
    assert!(incomplete[0].missing.contains(&"ID".to_string()));
    assert!(!incomplete[0].missing.contains(&"name".to_string()));
}
