//! Directory discovery for media collections.
//!
//! Classifies a tree into candidate records by kind:
//! - videos: every file with a video extension,
//! - albums: every directory that directly holds image files,
//! - models: every immediate subdirectory of the root.
//!
//! Candidates are sparse records (only discovered fields); ingestion lays
//! them over the kind's template. Hidden entries are ignored and results are
//! sorted by path.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use shelf_catalog::{MediaKind, Record};
use walkdir::{DirEntry, WalkDir};

use crate::error::ShelfError;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Image stems treated as a cover rather than an album page.
const COVER_STEMS: &[&str] = &["poster", "cover", "folder"];
/// Image stems preferred as a model's portrait, best first.
const PORTRAIT_STEMS: &[&str] = &["poster", "avatar", "cover"];

/// Lowercased extension check against a list.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|n| n.starts_with('.'))
}

fn stem_lower(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default()
        .into_owned()
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Files under `root` (recursively, sorted, hidden skipped) that pass `keep`.
/// Unreadable entries are logged and skipped.
fn walk_files(root: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                None
            }
        })
        .filter(|e| e.file_type().is_file() && keep(e.path()))
        .map(DirEntry::into_path)
        .collect()
}

/// Upper-cased name of the `n`th ancestor directory (1 = parent).
fn ancestor_label(path: &Path, n: usize) -> Option<String> {
    path.ancestors()
        .nth(n)
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_uppercase())
        .filter(|s| !s.trim().is_empty())
}

/// Discover candidate records of `kind` under `root`.
pub fn discover(root: &Path, kind: MediaKind) -> Result<Vec<Record>, ShelfError> {
    let root = std::path::absolute(root).map_err(|e| ShelfError::io(root, e))?;
    if !root.is_dir() {
        return Err(ShelfError::io(
            &root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    let records = match kind {
        MediaKind::Video => discover_videos(&root),
        MediaKind::Album => discover_albums(&root),
        MediaKind::Model => discover_models(&root)?,
    };
    log::debug!("Discovered {} {kind} candidate(s) under {}", records.len(), root.display());
    Ok(records)
}

/// One record per video file: title from the stem, series from the parent
/// directory, studio from the grandparent.
fn discover_videos(root: &Path) -> Vec<Record> {
    walk_files(root, |p| has_extension(p, VIDEO_EXTENSIONS))
        .into_iter()
        .map(|path| {
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut record = Record::new()
                .with("title", title)
                .with("path", path_string(&path));
            if let Some(series) = ancestor_label(&path, 1) {
                record.set("series", series);
            }
            if let Some(studio) = ancestor_label(&path, 2) {
                record.set("studio", studio);
            }
            record
        })
        .collect()
}

/// One record per directory holding images. A `poster`/`cover` image becomes
/// the album's poster instead of a page.
fn discover_albums(root: &Path) -> Vec<Record> {
    let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for image in walk_files(root, |p| has_extension(p, IMAGE_EXTENSIONS)) {
        if let Some(parent) = image.parent() {
            by_dir.entry(parent.to_path_buf()).or_default().push(image);
        }
    }

    by_dir
        .into_iter()
        .filter_map(|(dir, images)| {
            let mut imgs = Map::new();
            let mut poster = None;
            for image in images {
                if poster.is_none() && COVER_STEMS.contains(&stem_lower(&image).as_str()) {
                    poster = Some(path_string(&image));
                    continue;
                }
                imgs.insert(
                    name_of(&image),
                    json!({ "path": path_string(&image), "is_poster": false }),
                );
            }
            if imgs.is_empty() {
                return None;
            }
            let mut record = Record::new()
                .with("title", name_of(&dir))
                .with("path", path_string(&dir))
                .with("imgs", Value::Object(imgs));
            if let Some(poster) = poster {
                record.set("poster", poster);
            }
            if let Some(studio) = ancestor_label(&dir, 1) {
                record.set("studio", studio);
            }
            Some(record)
        })
        .collect()
}

/// One record per top-level directory, named after it, with a portrait
/// picked from the images inside.
fn discover_models(root: &Path) -> Result<Vec<Record>, ShelfError> {
    let mut records = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ShelfError::io(&path, e.into())
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        let mut record = Record::new().with("name", name_of(dir));
        if let Some(portrait) = pick_portrait(dir) {
            record.set("poster", path_string(&portrait));
        }
        records.push(record);
    }
    Ok(records)
}

fn pick_portrait(dir: &Path) -> Option<PathBuf> {
    let images: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), IMAGE_EXTENSIONS))
        .map(DirEntry::into_path)
        .collect();
    PORTRAIT_STEMS
        .iter()
        .find_map(|stem| images.iter().find(|p| stem_lower(p) == *stem))
        .or_else(|| images.first())
        .cloned()
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
