use super::*;
use image::{ImageFormat, Rgb, RgbImage};
use std::fs;

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(4, 3, Rgb([200, 10, 10]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[test]
fn test_is_remote() {
    assert!(is_remote("https://example.com/a.jpg"));
    assert!(is_remote("HTTP://example.com/a.jpg"));
    assert!(!is_remote("/local/a.jpg"));
}

#[test]
fn test_encode_jpeg_from_png() {
    let jpeg = encode_jpeg(&png_bytes(), "mem").unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 3));
}

#[test]
fn test_encode_jpeg_rejects_garbage() {
    let err = encode_jpeg(b"not an image", "mem").unwrap_err();
    assert!(matches!(err, MaterializeError::Image { .. }));
}

#[test]
fn test_local_cover_copies_jpeg_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("a.JPG");
    fs::write(&src, b"raw-bytes").unwrap();
    assert_eq!(local_cover_bytes(&src).unwrap(), b"raw-bytes");

    let png = dir.path().join("b.png");
    fs::write(&png, png_bytes()).unwrap();
    assert_eq!(&local_cover_bytes(&png).unwrap()[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_probe_order() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("Demo.mp4");
    fs::write(&video, b"v").unwrap();
    assert_eq!(probe_video_cover(None, &video), None);

    fs::write(dir.path().join("Demo.jpeg"), b"c").unwrap();
    assert_eq!(probe_video_cover(None, &video), Some(dir.path().join("Demo.jpeg")));

    fs::write(dir.path().join("Demo.Cover.png"), b"c").unwrap();
    assert_eq!(probe_video_cover(None, &video), Some(dir.path().join("Demo.Cover.png")));

    fs::write(dir.path().join("cover.JPG"), b"c").unwrap();
    assert_eq!(probe_video_cover(None, &video), Some(dir.path().join("cover.JPG")));
}

#[test]
fn test_probe_poster_dir_first() {
    let dir = tempfile::tempdir().unwrap();
    let art = dir.path().join("art");
    fs::create_dir(&art).unwrap();
    fs::write(art.join("poster.jpg"), b"p").unwrap();
    fs::write(dir.path().join("poster.jpg"), b"p").unwrap();
    let video = dir.path().join("Demo.mp4");

    // a missing poster file still points at its directory
    let missing = art.join("gone.jpg");
    assert_eq!(probe_video_cover(Some(missing.as_path()), &video), Some(art.join("poster.jpg")));
    // an extensionless poster path is treated as the directory itself
    assert_eq!(probe_video_cover(Some(art.as_path()), &video), Some(art.join("poster.jpg")));
}

#[test]
fn test_no_cover_fetcher() {
    assert!(matches!(
        NoCoverFetcher.fetch("https://x/y.jpg"),
        Err(MaterializeError::Fetch { .. })
    ));
}
