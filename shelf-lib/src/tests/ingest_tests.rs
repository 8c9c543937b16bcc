use super::*;

fn video(title: &str, path: &str) -> Record {
    Record::new().with("title", title).with("path", path)
}

#[test]
fn test_new_candidates_get_template_and_overrides() {
    let mut store = RecordStore::new();
    let overrides = IngestOverrides {
        studio: vec!["Bilibili".to_string()],
        model: vec!["Mai".to_string()],
        code_prefix: None,
    };

    let report = ingest_discovered(&mut store, vec![video("Clip", "/m/clip.mp4")], MediaKind::Video, &overrides);

    assert_eq!(report.added, vec!["Mai-Clip"]);
    let record = store.get("Mai-Clip").unwrap();
    assert_eq!(record.get_list("studio"), vec!["Bilibili"]);
    assert_eq!(record.get_str("path"), "/m/clip.mp4");
    // template fields are present
    assert!(record.contains("description"));
    assert!(record.contains("series"));
}

#[test]
fn test_rescan_converges() {
    let mut store = RecordStore::new();
    let overrides = IngestOverrides::default();
    let candidates = || vec![video("Clip", "/m/clip.mp4").with("studio", "S")];

    ingest_discovered(&mut store, candidates(), MediaKind::Video, &overrides);
    let mut edited = store.get("Unknown-Clip").unwrap().clone();
    edited.set("description", "hand written");
    store.replace("Unknown-Clip", edited);

    let report = ingest_discovered(&mut store, candidates(), MediaKind::Video, &overrides);

    assert_eq!(report.updated, vec!["Unknown-Clip"]);
    assert!(report.added.is_empty());
    let record = store.get("Unknown-Clip").unwrap();
    // no list growth, manual edit kept
    assert_eq!(record.get_list("studio"), vec!["S"]);
    assert_eq!(record.get_str("description"), "hand written");
}

#[test]
fn test_candidate_matches_existing_by_path() {
    let mut store = RecordStore::new();
    store.insert(
        "Rin-Old title",
        video("Old title", "/m/clip.mp4").with("model", "Rin"),
    );

    let report = ingest_discovered(
        &mut store,
        vec![video("New title", "/m/clip.mp4")],
        MediaKind::Video,
        &IngestOverrides::default(),
    );

    // the record follows its new title to a new key
    assert_eq!(report.updated, vec!["Rin-New title"]);
    assert_eq!(
        report.rekeyed,
        vec![("Rin-Old title".to_string(), "Rin-New title".to_string())]
    );
    assert_eq!(store.len(), 1);
    assert!(store.get("Rin-Old title").is_none());
    assert_eq!(store.get("Rin-New title").unwrap().get_str("path"), "/m/clip.mp4");
    assert!(report.collisions.is_empty());
}

#[test]
fn test_code_prefix_continues_numbering() {
    let mut store = RecordStore::new();
    store.insert("x", Record::new().with("code", "BB-234"));
    store.insert("y", Record::new().with("code", "ZZ-900"));
    assert_eq!(next_code_number(&store, "BB"), 235);
    assert_eq!(next_code_number(&store, "CC"), 1);

    let overrides = IngestOverrides {
        code_prefix: Some("BB".to_string()),
        ..Default::default()
    };
    let report = ingest_discovered(
        &mut store,
        vec![
            video("A", "/m/a.mp4"),
            video("B", "/m/b.mp4").with("code", "KEEP-1"),
            video("C", "/m/c.mp4"),
        ],
        MediaKind::Video,
        &overrides,
    );

    assert_eq!(
        report.codes_assigned,
        vec![
            ("Unknown-A".to_string(), "BB-235".to_string()),
            ("Unknown-C".to_string(), "BB-236".to_string()),
        ]
    );
    assert_eq!(store.get("Unknown-B").unwrap().get_str("code"), "KEEP-1");
}

#[test]
fn test_same_key_different_asset_is_a_reported_collision() {
    let mut store = RecordStore::new();
    let report = ingest_discovered(
        &mut store,
        vec![video("Clip", "/a/clip.mp4"), video("Clip", "/b/clip.mp4")],
        MediaKind::Video,
        &IngestOverrides::default(),
    );

    assert_eq!(store.len(), 1);
    assert_eq!(report.added, vec!["Unknown-Clip", "Unknown-Clip"]);
    assert!(report.updated.is_empty());
    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].key, "Unknown-Clip");
    assert_eq!(report.collisions[0].previous.get_str("path"), "/a/clip.mp4");
    assert_eq!(store.get("Unknown-Clip").unwrap().get_str("path"), "/b/clip.mp4");
}

#[test]
fn test_same_key_without_path_updates() {
    let mut store = RecordStore::new();
    store.insert("Unknown-Clip", new_record(MediaKind::Video).with("title", "Clip"));

    let report = ingest_discovered(
        &mut store,
        vec![video("Clip", "/m/clip.mp4")],
        MediaKind::Video,
        &IngestOverrides::default(),
    );

    assert_eq!(report.updated, vec!["Unknown-Clip"]);
    assert!(report.collisions.is_empty());
    assert_eq!(store.get("Unknown-Clip").unwrap().get_str("path"), "/m/clip.mp4");
}

#[test]
fn test_code_number_saturates() {
    let mut store = RecordStore::new();
    store.insert("x", Record::new().with("code", format!("BB-{}", u32::MAX)));
    assert_eq!(next_code_number(&store, "BB"), u32::MAX);
}

#[test]
fn test_scraped_records_merge_or_insert_full() {
    let mut store = RecordStore::new();
    store.insert(
        "Mai-Clip",
        new_record(MediaKind::Video)
            .with("title", "Clip")
            .with("code", "BB-001")
            .with("keywords", vec!["local"]),
    );
    let mut scraped = RecordStore::new();
    scraped.insert(
        "Unknown-Whatever",
        Record::new().with("code", "BB-001").with("keywords", vec!["web"]),
    );
    scraped.insert("Unknown-Fresh", Record::new().with("title", "Fresh"));

    let report = ingest_scraped(&mut store, &scraped, MediaKind::Video);

    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.inserted, vec!["Unknown-Fresh"]);
    assert_eq!(store.get("Mai-Clip").unwrap().get_list("keywords"), vec!["local", "web"]);
    let fresh = store.get("Unknown-Fresh").unwrap();
    assert_eq!(fresh.get_str("title"), "Fresh");
    assert!(fresh.contains("path"));
    assert_eq!(fresh.get_list("keywords"), Vec::<String>::new());
}

#[test]
fn test_scrape_rerun_leaves_lists_unchanged() {
    let mut store = RecordStore::new();
    store.insert(
        "Mai-Clip",
        new_record(MediaKind::Video)
            .with("title", "Clip")
            .with("code", "BB-001")
            .with("model", vec!["Mai"])
            .with("keywords", vec!["local"]),
    );
    let mut scraped = RecordStore::new();
    scraped.insert(
        "Mai-Clip",
        Record::new()
            .with("code", "BB-001")
            .with("model", vec!["Mai"])
            .with("keywords", vec!["web", "web"]),
    );

    ingest_scraped(&mut store, &scraped, MediaKind::Video);
    let first = store.get("Mai-Clip").unwrap().clone();
    assert_eq!(first.get_list("model"), vec!["Mai"]);
    assert_eq!(first.get_list("keywords"), vec!["local", "web"]);

    let report = ingest_scraped(&mut store, &scraped, MediaKind::Video);
    assert_eq!(report.matched.len(), 1);
    assert_eq!(store.get("Mai-Clip").unwrap(), &first);
}
