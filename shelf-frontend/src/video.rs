//! Video entities: `{code} - {title}/` with a `.strm` pointer, a cover and a
//! `movie` sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use shelf_catalog::{Record, VideoRecord};

use crate::artifact::{self, ArtifactOutcome, EntityReport};
use crate::cover::{self, COVER_FILE};
use crate::error::MaterializeError;
use crate::nfo::{NfoDocument, text_values};
use crate::paths::{base_name, dir_name, nfc};
use crate::Materializer;

/// Extensions of links left behind by the older link-per-video layout.
const STALE_LINK_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// Optional sidecar elements and the record fields they are read from, first
/// present field wins.
const OPTIONAL_ELEMENTS: &[(&str, &[&str])] = &[
    ("tagline", &["tagline"]),
    ("runtime", &["runtime"]),
    ("year", &["year"]),
    ("director", &["director"]),
    ("writer", &["writer"]),
    ("country", &["country"]),
    ("language", &["language"]),
    ("rating", &["rating"]),
    ("aspect", &["aspect_ratio", "aspect"]),
];

pub(crate) fn materialize(
    m: &Materializer,
    record: &Record,
    out_root: &Path,
    report: &mut EntityReport,
) -> Result<(), MaterializeError> {
    let video = record.to_video()?;
    let code = nfc(video.code.trim());
    let title = nfc(video.title.trim());
    let base = base_name(&code, &title)?;

    if video.path.trim().is_empty() {
        return Err(MaterializeError::invalid_record("video has no path"));
    }
    // Validate before touching the output tree.
    let rewritten = m.rewrite(video.path.trim());
    let source = PathBuf::from(&rewritten);
    if !source.is_file() {
        return Err(MaterializeError::MissingSource(rewritten));
    }
    let source = std::path::absolute(&source).map_err(|e| MaterializeError::io(&source, e))?;

    let dir = m.enter(out_root.join(dir_name(&[&code, &title])), report)?;

    artifact::remove_stale_links(&dir, &base, STALE_LINK_EXTENSIONS, report)?;

    let strm = dir.join(format!("{base}.strm"));
    let outcome = artifact::write_artifact(&strm, m.overwrite(), || {
        Ok(source.display().to_string().into_bytes())
    })?;
    report.record(&strm, outcome);

    let cover_path = dir.join(COVER_FILE);
    let has_cover = write_cover(m, &video, &source, &cover_path, report)?;

    let nfo = dir.join(format!("{base}.nfo"));
    let outcome = artifact::write_artifact(&nfo, m.overwrite(), || {
        Ok(movie_nfo(&video, &code, &title, &base, has_cover, &crate::today()).into_bytes())
    })?;
    report.record(&nfo, outcome);
    Ok(())
}

/// Write `poster.jpg` and return whether the directory ends up with one.
fn write_cover(
    m: &Materializer,
    video: &VideoRecord,
    source: &Path,
    cover_path: &Path,
    report: &mut EntityReport,
) -> Result<bool, MaterializeError> {
    if artifact::occupied(cover_path) && !m.overwrite() {
        report.record(cover_path, ArtifactOutcome::Skipped);
        return Ok(true);
    }
    match find_cover(m, video, source, cover_path, report) {
        Some(bytes) => {
            let outcome = artifact::write_artifact(cover_path, m.overwrite(), || Ok(bytes))?;
            report.record(cover_path, outcome);
            Ok(true)
        }
        None => {
            report.warn(format!("no cover found for {}", source.display()));
            Ok(artifact::occupied(cover_path))
        }
    }
}

/// Cover bytes from, in order: the explicit poster, a probed sibling image,
/// or a still frame. Each failed source is a warning.
fn find_cover(
    m: &Materializer,
    video: &VideoRecord,
    source: &Path,
    cover_path: &Path,
    report: &mut EntityReport,
) -> Option<Vec<u8>> {
    let poster = video.poster.as_deref().map(str::trim);
    let local_poster = poster.filter(|p| !cover::is_remote(p)).map(Path::new);

    if let Some(url) = poster.filter(|p| cover::is_remote(p)) {
        match m.covers().fetch(url).and_then(|b| cover::encode_jpeg(&b, url)) {
            Ok(bytes) => return Some(bytes),
            Err(e) => report.warn(format!("poster download failed: {e}")),
        }
    }
    if let Some(path) = local_poster.filter(|p| p.is_file()) {
        match cover::local_cover_bytes(path) {
            Ok(bytes) => return Some(bytes),
            Err(e) => report.warn(format!("unusable poster: {e}")),
        }
    }
    if let Some(found) = cover::probe_video_cover(local_poster, source) {
        match cover::local_cover_bytes(&found) {
            Ok(bytes) => return Some(bytes),
            Err(e) => report.warn(format!("unusable cover {}: {e}", found.display())),
        }
    }

    let frame = artifact::temp_sibling(&cover_path.with_file_name("frame.jpg"));
    let extracted = m
        .frames()
        .extract_frame(source, m.options().frame_offset, &frame)
        .and_then(|()| fs::read(&frame).map_err(|e| MaterializeError::io(&frame, e)));
    let _ = fs::remove_file(&frame);
    match extracted {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            report.warn(format!("frame fallback failed: {e}"));
            None
        }
    }
}

/// Build the `movie` sidecar.
pub fn movie_nfo(
    video: &VideoRecord,
    code: &str,
    title: &str,
    base: &str,
    has_cover: bool,
    today: &str,
) -> String {
    let mut doc = NfoDocument::new("movie");

    let display_title = match (code.is_empty(), title.is_empty()) {
        (false, false) => format!("{code} - {title}"),
        (true, _) => title.to_string(),
        (false, true) => code.to_string(),
    };
    let plot = video.description.trim();
    doc.tag("title", &display_title)
        .tag("originaltitle", base)
        .tag("sorttitle", base)
        .tag("plot", plot)
        .tag("outline", plot);

    let premiered = ["premiered", "release_date"]
        .iter()
        .filter_map(|field| video.extra.get(*field))
        .flat_map(text_values)
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| today.to_string());
    doc.tag("premiered", &premiered).tag("dateadded", today);

    let prefix = code.split('-').next().unwrap_or_default().trim();
    doc.opt_tag("tag", prefix);
    let series = video.series.trim();
    if !series.is_empty() && series != prefix {
        doc.tag("tag", series);
    }

    for (element, fields) in OPTIONAL_ELEMENTS {
        if let Some(value) = fields.iter().find_map(|f| video.extra.get(*f)) {
            doc.tags(element, &text_values(value));
        }
    }

    doc.tags("genre", &video.keywords);
    for model in &video.model {
        doc.actor(&nfc(model.trim()), "Model");
    }
    for studio in video.studio.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        doc.tag("studio", studio).tag("genre", studio);
    }
    if has_cover {
        doc.tag("thumb", COVER_FILE);
    }
    if !code.is_empty() {
        doc.tag_with_attrs("uniqueid", &[("type", "code"), ("default", "true")], code)
            .tag("id", code);
    }
    doc.tag("lockdata", "true");
    doc.finish()
}
