//! Projects reconciled records into a media-center library tree.
//!
//! Each entity becomes one directory holding links or a pointer to the
//! original media, a `poster.jpg` cover, and an `.nfo` sidecar. Runs are
//! idempotent: with overwrite off, anything already on disk is left alone.

pub mod album;
pub mod artifact;
pub mod cover;
pub mod error;
pub mod frame;
pub mod nfo;
pub mod paths;
pub mod person;
pub mod video;

pub use artifact::{ArtifactOutcome, ArtifactReport, EntityReport, EntityState};
pub use cover::{CoverFetcher, NoCoverFetcher};
pub use error::MaterializeError;
pub use frame::{DEFAULT_FRAME_OFFSET, FfmpegFrameExtractor, FrameExtractor, NoFrameExtractor};
pub use paths::PathRewrite;

use std::path::{Path, PathBuf};
use std::time::Duration;

use shelf_catalog::{MediaKind, Record};

/// Options shared by every handler in a batch.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    /// Rewrite artifacts that already exist instead of skipping them.
    pub overwrite: bool,
    /// Applied to video source paths before validation.
    pub path_rewrite: Option<PathRewrite>,
    /// Offset of the fallback still frame.
    pub frame_offset: Duration,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            path_rewrite: None,
            frame_offset: DEFAULT_FRAME_OFFSET,
        }
    }
}

/// Materializes records of any kind under an output root.
pub struct Materializer {
    options: MaterializeOptions,
    frames: Box<dyn FrameExtractor>,
    covers: Box<dyn CoverFetcher>,
}

impl Materializer {
    /// A materializer with frame extraction and remote covers disabled.
    pub fn new(options: MaterializeOptions) -> Self {
        Self {
            options,
            frames: Box::new(NoFrameExtractor),
            covers: Box::new(NoCoverFetcher),
        }
    }

    pub fn with_frame_extractor(mut self, frames: impl FrameExtractor + 'static) -> Self {
        self.frames = Box::new(frames);
        self
    }

    pub fn with_cover_fetcher(mut self, covers: impl CoverFetcher + 'static) -> Self {
        self.covers = Box::new(covers);
        self
    }

    pub fn options(&self) -> &MaterializeOptions {
        &self.options
    }

    /// Materialize one record. Never fails: errors that abort the entity end
    /// up as [`EntityState::Failed`] on the returned report.
    pub fn materialize(&self, key: &str, record: &Record, kind: MediaKind, out_root: &Path) -> EntityReport {
        let mut report = EntityReport::new(key, kind);
        if let Err(e) = self.try_materialize(record, kind, out_root, &mut report) {
            log::warn!("{key}: {e}");
            report.state = EntityState::Failed(e.to_string());
        }
        report
    }

    /// Like [`Materializer::materialize`] but returns the aborting error.
    pub fn try_materialize(
        &self,
        record: &Record,
        kind: MediaKind,
        out_root: &Path,
        report: &mut EntityReport,
    ) -> Result<(), MaterializeError> {
        match kind {
            MediaKind::Video => video::materialize(self, record, out_root, report),
            MediaKind::Album => album::materialize(self, record, out_root, report),
            MediaKind::Model => person::materialize(self, record, out_root, report),
        }
    }

    /// Create (or reuse) the entity directory and settle the entity state.
    pub(crate) fn enter(&self, dir: PathBuf, report: &mut EntityReport) -> Result<PathBuf, MaterializeError> {
        let existed = artifact::ensure_dir(&dir)?;
        report.state = match (existed, self.options.overwrite) {
            (false, _) => EntityState::Created,
            (true, false) => EntityState::Skipped,
            (true, true) => EntityState::Recreated,
        };
        report.dir = Some(dir.clone());
        Ok(dir)
    }

    pub(crate) fn rewrite(&self, path: &str) -> String {
        match &self.options.path_rewrite {
            Some(rw) => rw.apply(path),
            None => path.to_string(),
        }
    }

    pub(crate) fn overwrite(&self) -> bool {
        self.options.overwrite
    }

    pub(crate) fn frames(&self) -> &dyn FrameExtractor {
        self.frames.as_ref()
    }

    pub(crate) fn covers(&self) -> &dyn CoverFetcher {
        self.covers.as_ref()
    }
}

/// Today's date as written into sidecars.
pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
#[path = "tests/materialize_tests.rs"]
mod tests;
