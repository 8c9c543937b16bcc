use std::fs;

use super::*;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
}

#[test]
fn test_has_extension_ignores_case() {
    assert!(has_extension(Path::new("a/B.MP4"), VIDEO_EXTENSIONS));
    assert!(!has_extension(Path::new("a/B.mp3"), VIDEO_EXTENSIONS));
    assert!(!has_extension(Path::new("noext"), IMAGE_EXTENSIONS));
}

#[test]
fn test_discover_videos() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("Studio");
    touch(&root.join("dance").join("clip one.mp4"));
    touch(&root.join("dance").join("clip one.Cover.jpg"));
    touch(&root.join("dance").join(".hidden.mp4"));
    touch(&root.join("dance").join("notes.txt"));
    touch(&root.join("dance").join("b.MKV"));

    let records = discover(&root, MediaKind::Video).unwrap();

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.get_str("title"), "b");
    let second = &records[1];
    assert_eq!(second.get_str("title"), "clip one");
    assert_eq!(second.get_str("series"), "DANCE");
    assert_eq!(second.get_list("studio"), vec!["STUDIO"]);
    assert!(Path::new(second.get_str("path")).is_absolute());
    assert!(second.get_str("path").ends_with("clip one.mp4"));
}

#[test]
fn test_discover_albums() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let set = root.join("Set A");
    touch(&set.join("01.jpg"));
    touch(&set.join("02.png"));
    touch(&set.join("cover.jpg"));
    touch(&root.join("Set B").join("readme.txt"));
    touch(&root.join("Set C").join("cover.jpg"));

    let records = discover(root, MediaKind::Album).unwrap();

    // Set B has no images; Set C only a cover
    assert_eq!(records.len(), 1);
    let album = records[0].to_album().unwrap();
    assert_eq!(album.title, "Set A");
    assert_eq!(album.imgs.len(), 2);
    assert!(album.imgs.contains_key("01.jpg"));
    assert!(!album.imgs["02.png"].is_poster);
    assert!(album.poster.unwrap().ends_with("cover.jpg"));
}

#[test]
fn test_discover_models() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    touch(&root.join("Mai").join("a.jpg"));
    touch(&root.join("Mai").join("avatar.png"));
    fs::create_dir_all(root.join("Rin")).unwrap();
    touch(&root.join("loose.jpg"));

    let records = discover(root, MediaKind::Model).unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.get_str("name")).collect();
    assert_eq!(names, vec!["Mai", "Rin"]);
    assert!(records[0].get_str("poster").ends_with("avatar.png"));
    assert!(!records[1].contains("poster"));
}

#[test]
fn test_missing_root_is_error() {
    let tmp = tempfile::tempdir().unwrap();
    let result = discover(&tmp.path().join("absent"), MediaKind::Video);
    assert!(matches!(result, Err(ShelfError::Io { .. })));
}
