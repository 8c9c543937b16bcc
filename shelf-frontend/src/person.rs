//! Performer entities: `{name}/` with a re-encoded portrait and a `person`
//! sidecar.

use std::path::Path;

use chrono::Datelike;
use shelf_catalog::{ExtraValue, ModelRecord, Record};

use crate::artifact::{self, ArtifactOutcome, EntityReport};
use crate::cover::{self, COVER_FILE};
use crate::error::MaterializeError;
use crate::nfo::NfoDocument;
use crate::paths::{nfc, sanitize};
use crate::Materializer;

/// `age` values at or above this are already a birth year.
const BIRTH_YEAR_THRESHOLD: i64 = 1900;

/// Extra attributes rendered by dedicated elements rather than the overview.
const DEDICATED_EXTRAS: &[&str] = &["age", "figure", "overview", "type"];

pub(crate) fn materialize(
    m: &Materializer,
    record: &Record,
    out_root: &Path,
    report: &mut EntityReport,
) -> Result<(), MaterializeError> {
    let model = record.to_model()?;
    let name = nfc(model.name.trim());
    if name.is_empty() {
        return Err(MaterializeError::invalid_record("model record has no name"));
    }
    let file_name = sanitize(&name);
    let dir = m.enter(out_root.join(&file_name), report)?;

    let cover_path = dir.join(COVER_FILE);
    let has_cover = if artifact::occupied(&cover_path) && !m.overwrite() {
        report.record(&cover_path, ArtifactOutcome::Skipped);
        true
    } else {
        match model.cover_source().map(str::trim).filter(|s| !s.is_empty()) {
            None => {
                report.warn("no poster_url provided");
                artifact::occupied(&cover_path)
            }
            Some(source) => match portrait_bytes(m, source) {
                Ok(bytes) => {
                    let outcome = artifact::write_artifact(&cover_path, m.overwrite(), || Ok(bytes))?;
                    report.record(&cover_path, outcome);
                    true
                }
                Err(e) => {
                    report.warn(format!("poster unavailable: {e}"));
                    artifact::occupied(&cover_path)
                }
            },
        }
    };

    let nfo = dir.join(format!("{file_name}.nfo"));
    let year = chrono::Local::now().year() as i64;
    let outcome = artifact::write_artifact(&nfo, m.overwrite(), || {
        Ok(person_nfo(&model, &name, has_cover, year).into_bytes())
    })?;
    report.record(&nfo, outcome);
    Ok(())
}

/// Download or read the portrait and re-encode it as JPEG.
fn portrait_bytes(m: &Materializer, source: &str) -> Result<Vec<u8>, MaterializeError> {
    let bytes = if cover::is_remote(source) {
        m.covers().fetch(source)?
    } else {
        let path = Path::new(source);
        std::fs::read(path).map_err(|e| MaterializeError::io(path, e))?
    };
    cover::encode_jpeg(&bytes, source)
}

/// Build the `person` sidecar. `current_year` turns an age into a birth year.
pub fn person_nfo(model: &ModelRecord, name: &str, has_cover: bool, current_year: i64) -> String {
    let mut doc = NfoDocument::new("person");
    doc.tag("name", name).tag("type", "actor");

    if let Some(age) = model.extra.get("age").and_then(ExtraValue::as_i64) {
        let birth_year = if age < BIRTH_YEAR_THRESHOLD {
            current_year.checked_sub(age)
        } else {
            Some(age)
        };
        match birth_year {
            Some(year) => {
                doc.tag("birthyear", &year.to_string());
            }
            None => log::warn!("{name}: age {age} is out of range, birthyear left out"),
        }
    }

    doc.tags("studio", &model.studio)
        .tags("aka", &model.real_name)
        .tags("socials", &model.sns);

    for (key, value) in &model.extra {
        if let ExtraValue::Number(n) = value
            && key.ends_with("_score")
        {
            doc.tag("tag", &format!("{key}:{n}"));
        }
    }

    let overview = overview_parts(model);
    if !overview.is_empty() {
        doc.tag("overview", &overview.join(" | "));
    }
    if has_cover {
        doc.tag("image", COVER_FILE);
    }
    doc.finish()
}

/// Free-text pieces of the overview: figure, description, comments and any
/// `overview` text first, then every remaining attribute as `key: value`.
fn overview_parts(model: &ModelRecord) -> Vec<String> {
    let mut parts = Vec::new();

    if let Some(figure) = model.extra.get("figure").and_then(plain_text) {
        parts.push(format!("Figure: {figure}"));
    }
    let overview = model.extra.get("overview").and_then(plain_text);
    for text in [
        Some(model.description.trim().to_string()),
        Some(model.comments.trim().to_string()),
        overview,
    ]
    .into_iter()
    .flatten()
    .filter(|t| !t.is_empty())
    {
        parts.push(text);
    }
    if !model.id.trim().is_empty() {
        parts.push(format!("ID: {}", model.id.trim()));
    }

    for (key, value) in &model.extra {
        if DEDICATED_EXTRAS.contains(&key.as_str()) {
            continue;
        }
        match value {
            ExtraValue::Number(_) if key.ends_with("_score") => {}
            ExtraValue::Number(n) => parts.push(format!("{key}: {n}")),
            ExtraValue::Text(s) if !s.trim().is_empty() => parts.push(format!("{key}: {}", s.trim())),
            ExtraValue::Text(_) => {}
            ExtraValue::List(items) => parts.extend(items.iter().map(|v| format!("{key}: {v}"))),
            ExtraValue::Map(map) => parts.push(format!(
                "{key}: {}",
                serde_json::Value::Object(map.clone())
            )),
            ExtraValue::Other(serde_json::Value::Bool(b)) => parts.push(format!("{key}: {b}")),
            ExtraValue::Other(_) => {}
        }
    }
    parts
}

fn plain_text(value: &ExtraValue) -> Option<String> {
    let text = match value {
        ExtraValue::Text(s) => s.trim().to_string(),
        ExtraValue::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
