//! Cover sources: remote fetch, sibling probing, and JPEG re-encoding.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;

use crate::error::MaterializeError;

/// JPEG quality used for every re-encoded cover.
pub const JPEG_QUALITY: u8 = 90;

/// Name of the cover file written into every entity directory.
pub const COVER_FILE: &str = "poster.jpg";

const PROBE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "JPG", "JPEG", "png"];

/// Downloads remote cover images.
pub trait CoverFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MaterializeError>;
}

/// Offline fetcher; every remote cover is reported as unavailable.
#[derive(Debug, Default)]
pub struct NoCoverFetcher;

impl CoverFetcher for NoCoverFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MaterializeError> {
        Err(MaterializeError::fetch(url, "network access is disabled"))
    }
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Decode any supported image and re-encode it as an RGB JPEG.
pub fn encode_jpeg(bytes: &[u8], origin: &str) -> Result<Vec<u8>, MaterializeError> {
    let image_err = |source| MaterializeError::Image {
        path: origin.to_string(),
        source,
    };
    let rgb = image::load_from_memory(bytes).map_err(image_err)?.to_rgb8();

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(image_err)?;
    Ok(out.into_inner())
}

/// Bytes for `poster.jpg` from a local image: JPEG sources are copied as
/// they are, anything else is re-encoded.
pub fn local_cover_bytes(source: &Path) -> Result<Vec<u8>, MaterializeError> {
    let bytes = std::fs::read(source).map_err(|e| MaterializeError::io(source, e))?;
    let is_jpeg = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    if is_jpeg {
        Ok(bytes)
    } else {
        encode_jpeg(&bytes, &source.display().to_string())
    }
}

/// Look for a conventional cover image next to a video.
///
/// Directories searched, in order: the explicit poster's directory (or the
/// poster path itself when it has no extension), then the video's directory.
/// Names tried in each: `poster`, `cover`, `{stem}.Cover`, `{stem}`.
pub fn probe_video_cover(poster: Option<&Path>, video: &Path) -> Option<PathBuf> {
    let mut dirs: Vec<&Path> = Vec::new();
    if let Some(poster) = poster {
        let dir = if poster.extension().is_some() {
            poster.parent()
        } else {
            Some(poster)
        };
        dirs.extend(dir);
    }
    dirs.extend(video.parent());
    dirs.dedup();

    let stem = video.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let mut names = vec!["poster".to_string(), "cover".to_string()];
    if !stem.is_empty() {
        names.push(format!("{stem}.Cover"));
        names.push(stem);
    }

    dirs.iter()
        .flat_map(|dir| {
            names.iter().flat_map(move |name| {
                PROBE_EXTENSIONS
                    .iter()
                    .map(move |ext| dir.join(format!("{name}.{ext}")))
            })
        })
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
#[path = "tests/cover_tests.rs"]
mod tests;
