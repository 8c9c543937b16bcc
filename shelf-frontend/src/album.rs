//! Album entities: numbered links to the source images, a cover and a
//! `photoalbum` sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use shelf_catalog::{AlbumRecord, ImageRef, Record, order_by_sort_key};

use crate::artifact::{self, ArtifactOutcome, EntityReport};
use crate::cover::{self, COVER_FILE};
use crate::error::MaterializeError;
use crate::nfo::NfoDocument;
use crate::paths::{base_name, dir_name, nfc};
use crate::Materializer;

/// An image that survived sorting and exists on disk.
struct Member {
    name: String,
    image: ImageRef,
}

pub(crate) fn materialize(
    m: &Materializer,
    record: &Record,
    out_root: &Path,
    report: &mut EntityReport,
) -> Result<(), MaterializeError> {
    let album = record.to_album()?;
    let code = nfc(album.code.trim());
    let title = nfc(album.title.trim());
    let models: Vec<String> = album
        .model
        .iter()
        .map(|s| nfc(s.trim()))
        .filter(|s| !s.is_empty())
        .collect();
    let base = base_name(&code, &title)?;

    let members = ordered_members(&album, report);
    let dir = m.enter(out_root.join(dir_name(&[&models.join(", "), &title, &code])), report)?;

    let mut linked = Vec::with_capacity(members.len());
    for (i, member) in members.iter().enumerate() {
        let ext = Path::new(&member.name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let link = dir.join(format!("{:03}{ext}", i + 1));
        let target = std::path::absolute(&member.image.path)
            .map_err(|e| MaterializeError::io(Path::new(&member.image.path), e))?;
        let outcome = artifact::link_artifact(&target, &link, m.overwrite())?;
        report.record(&link, outcome);
        linked.push(link);
    }
    if m.overwrite() {
        remove_leftover_links(&dir, &linked, report)?;
    }

    let cover_path = dir.join(COVER_FILE);
    let has_cover = if artifact::occupied(&cover_path) && !m.overwrite() {
        report.record(&cover_path, ArtifactOutcome::Skipped);
        true
    } else {
        match pick_cover(&album, &members) {
            Some(source) => match cover::local_cover_bytes(&source) {
                Ok(bytes) => {
                    let outcome = artifact::write_artifact(&cover_path, m.overwrite(), || Ok(bytes))?;
                    report.record(&cover_path, outcome);
                    true
                }
                Err(e) => {
                    report.warn(format!("unusable cover: {e}"));
                    artifact::occupied(&cover_path)
                }
            },
            None => {
                report.warn("album has no usable cover image");
                artifact::occupied(&cover_path)
            }
        }
    };

    let nfo = dir.join(format!("{base}.nfo"));
    let outcome = artifact::write_artifact(&nfo, m.overwrite(), || {
        Ok(album_nfo(&album, &code, &title, &models, has_cover).into_bytes())
    })?;
    report.record(&nfo, outcome);
    Ok(())
}

/// Sort the album's images, dropping (with a warning) names without a sort
/// key and files that no longer exist.
fn ordered_members(album: &AlbumRecord, report: &mut EntityReport) -> Vec<Member> {
    let items = album
        .imgs
        .iter()
        .map(|(name, image)| (name.clone(), image.clone()))
        .collect();
    let (ordered, rejected) = order_by_sort_key(items);
    for (name, e) in rejected {
        report.warn(format!("skipping image {name}: {e}"));
    }

    let mut members = Vec::with_capacity(ordered.len());
    for (_, name, image) in ordered {
        if Path::new(&image.path).is_file() {
            members.push(Member { name, image });
        } else {
            report.warn(format!("missing image file {}", image.path));
        }
    }
    members
}

/// Cover choice: a flagged image, then the image named by `poster`, then a
/// `poster` path on disk, then the first image in order.
fn pick_cover(album: &AlbumRecord, members: &[Member]) -> Option<PathBuf> {
    if let Some(flagged) = members.iter().find(|m| m.image.is_poster) {
        return Some(PathBuf::from(&flagged.image.path));
    }
    if let Some(poster) = album.poster.as_deref().map(str::trim) {
        if let Some(named) = members.iter().find(|m| m.name == poster) {
            return Some(PathBuf::from(&named.image.path));
        }
        if Path::new(poster).is_file() {
            return Some(PathBuf::from(poster));
        }
    }
    members.first().map(|m| PathBuf::from(&m.image.path))
}

/// `NNN` or `NNN.ext`, the names given to album links.
fn is_numbered_name(name: &str) -> bool {
    let (stem, _) = name.split_once('.').unwrap_or((name, ""));
    stem.len() == 3 && stem.bytes().all(|b| b.is_ascii_digit())
}

/// Drop numbered links from a previous run that no longer correspond to an
/// image, e.g. after an image was removed from the album.
fn remove_leftover_links(dir: &Path, keep: &[PathBuf], report: &mut EntityReport) -> Result<(), MaterializeError> {
    let entries = fs::read_dir(dir).map_err(|e| MaterializeError::io(dir, e))?;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_link = entry.file_type().is_ok_and(|t| t.is_symlink());
        if is_link && is_numbered_name(&name) && !keep.contains(&path) {
            fs::remove_file(&path).map_err(|e| MaterializeError::io(&path, e))?;
            report.record(&path, ArtifactOutcome::Removed);
        }
    }
    Ok(())
}

/// Build the `photoalbum` sidecar.
pub fn album_nfo(album: &AlbumRecord, code: &str, title: &str, models: &[String], has_cover: bool) -> String {
    let mut doc = NfoDocument::new("photoalbum");
    doc.tag("title", title)
        .tag("originaltitle", code)
        .tag("plot", album.description.trim())
        .tags("studio", &album.studio)
        .tags("tag", &album.keywords);
    for model in models {
        doc.actor(model, "Model");
    }
    if has_cover {
        doc.tag("thumb", COVER_FILE);
    }
    if !code.is_empty() {
        doc.tag("id", code);
    }
    doc.finish()
}
