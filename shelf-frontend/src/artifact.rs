//! Per-entity and per-artifact outcomes, and the filesystem primitives that
//! produce them.
//!
//! Every file write goes to a hidden temporary sibling first and is renamed
//! into place, so an interrupted run never leaves a truncated artifact behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use shelf_catalog::MediaKind;

use crate::error::MaterializeError;

// ── Outcomes ────────────────────────────────────────────────────────────────

/// What happened to one artifact (pointer, link, cover, sidecar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactOutcome {
    Created,
    Skipped,
    Recreated,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    /// File name inside the entity directory.
    pub name: String,
    pub outcome: ArtifactOutcome,
}

/// Terminal state of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "reason")]
pub enum EntityState {
    /// The entity directory did not exist before this run.
    Created,
    /// The directory existed and overwrite was off.
    Skipped,
    /// The directory existed and overwrite was on.
    Recreated,
    Failed(String),
}

impl EntityState {
    pub fn is_failed(&self) -> bool {
        matches!(self, EntityState::Failed(_))
    }
}

/// Everything the materializer did for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    /// Identity key of the record in its store.
    pub key: String,
    pub kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(flatten)]
    pub state: EntityState,
    pub artifacts: Vec<ArtifactReport>,
    pub warnings: Vec<String>,
}

impl EntityReport {
    pub fn new(key: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            key: key.into(),
            kind,
            dir: None,
            state: EntityState::Created,
            artifacts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, path: &Path, outcome: ArtifactOutcome) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::debug!("{}: {:?} {}", self.key, outcome, path.display());
        self.artifacts.push(ArtifactReport { name, outcome });
    }

    pub(crate) fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("{}: {}", self.key, msg);
        self.warnings.push(msg);
    }

    pub fn outcome_of(&self, name: &str) -> Option<ArtifactOutcome> {
        self.artifacts
            .iter()
            .rev()
            .find(|a| a.name == name)
            .map(|a| a.outcome)
    }
}

// ── Filesystem primitives ───────────────────────────────────────────────────

/// Create the entity directory. Returns whether it already existed.
pub(crate) fn ensure_dir(dir: &Path) -> Result<bool, MaterializeError> {
    let existed = dir.is_dir();
    if !existed {
        fs::create_dir_all(dir).map_err(|e| MaterializeError::io(dir, e))?;
    }
    Ok(existed)
}

/// Does anything (including a dangling link) occupy `path`?
pub(crate) fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Hidden temporary sibling used for atomic replacement.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `bytes` to `path` through a temporary sibling and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_sibling(path);
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// Remove whatever occupies `path` so a fresh artifact can take its place.
fn clear(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Apply the overwrite rule to a file artifact whose content is computed
/// lazily by `contents`. Nothing is computed when the artifact is skipped.
pub(crate) fn write_artifact<F>(
    path: &Path,
    overwrite: bool,
    contents: F,
) -> Result<ArtifactOutcome, MaterializeError>
where
    F: FnOnce() -> Result<Vec<u8>, MaterializeError>,
{
    let exists = occupied(path);
    if exists && !overwrite {
        return Ok(ArtifactOutcome::Skipped);
    }
    let bytes = contents()?;
    if exists && !path.is_file() {
        clear(path).map_err(|e| MaterializeError::io(path, e))?;
    }
    write_atomic(path, &bytes).map_err(|e| MaterializeError::io(path, e))?;
    Ok(if exists {
        ArtifactOutcome::Recreated
    } else {
        ArtifactOutcome::Created
    })
}

/// Link `link` to `target` without copying data. Symlinks are preferred; a
/// hard link is used where a symlink cannot be made.
pub(crate) fn link_artifact(
    target: &Path,
    link: &Path,
    overwrite: bool,
) -> Result<ArtifactOutcome, MaterializeError> {
    let exists = occupied(link);
    if exists && !overwrite {
        return Ok(ArtifactOutcome::Skipped);
    }

    let tmp = temp_sibling(link);
    if occupied(&tmp) {
        clear(&tmp).map_err(|e| MaterializeError::io(&tmp, e))?;
    }
    make_link(target, &tmp).map_err(|e| MaterializeError::io(link, e))?;
    if exists && fs::symlink_metadata(link).is_ok_and(|m| m.is_dir()) {
        clear(link).map_err(|e| MaterializeError::io(link, e))?;
    }
    fs::rename(&tmp, link).map_err(|e| MaterializeError::io(link, e))?;

    Ok(if exists {
        ArtifactOutcome::Recreated
    } else {
        ArtifactOutcome::Created
    })
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link).or_else(|e| {
        log::debug!("symlink {} failed ({e}), trying a hard link", link.display());
        fs::hard_link(target, link)
    })
}

#[cfg(not(unix))]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    fs::hard_link(target, link)
}

/// Remove `{base}.{ext}` entries that are symlinks. Regular files are never
/// touched.
pub(crate) fn remove_stale_links(
    dir: &Path,
    base: &str,
    extensions: &[&str],
    report: &mut EntityReport,
) -> Result<(), MaterializeError> {
    for ext in extensions {
        let candidate = dir.join(format!("{base}.{ext}"));
        let is_link = fs::symlink_metadata(&candidate).is_ok_and(|m| m.file_type().is_symlink());
        if is_link {
            fs::remove_file(&candidate).map_err(|e| MaterializeError::io(&candidate, e))?;
            report.record(&candidate, ArtifactOutcome::Removed);
        }
    }
    Ok(())
}
