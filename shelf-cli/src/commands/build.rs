use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_catalog::{MediaKind, RecordStore};
use shelf_frontend::{EntityState, FfmpegFrameExtractor, Materializer, PathRewrite};
use shelf_lib::{BatchEvent, Settings, run_materialize};
use shelf_scraper::HttpClient;

use crate::error::CliError;
use crate::logging;
use crate::progress::Progress;

pub(crate) struct BuildOptions<'a> {
    pub overwrite: bool,
    pub rewrite: Option<PathRewrite>,
    pub report: Option<&'a Path>,
    pub offline: bool,
}

/// Run the build command: materialize every record of the store.
pub(crate) fn run_build(
    settings: &Settings,
    store_path: &Path,
    out: &Path,
    kind: MediaKind,
    options: BuildOptions<'_>,
) -> Result<(), CliError> {
    let store = RecordStore::load(store_path)?;

    let mut materialize = settings.materialize_options(options.overwrite);
    if options.rewrite.is_some() {
        materialize.path_rewrite = options.rewrite;
    }
    let mut materializer = Materializer::new(materialize)
        .with_frame_extractor(FfmpegFrameExtractor::new(settings.materialize.ffmpeg.clone()));
    if !options.offline {
        materializer = materializer.with_cover_fetcher(HttpClient::new(settings.network.client_config())?);
    }

    log::info!(
        "Building {} {kind} entities into {}",
        store.len(),
        out.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let pb = Progress::new(logging::is_quiet());
    let mut on_event = |event: BatchEvent| match event {
        BatchEvent::Started { total } => pb.start_bar(total),
        BatchEvent::EntityStarted { key, .. } => pb.message(key),
        BatchEvent::EntityFinished { report, .. } => {
            pb.inc();
            pb.suspend(|| match &report.state {
                EntityState::Created => log::info!(
                    "  {} {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    report.key,
                ),
                EntityState::Recreated => log::info!(
                    "  {} {} {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    report.key,
                    "(recreated)".if_supports_color(Stdout, |t| t.dimmed()),
                ),
                EntityState::Skipped => log::debug!("  - {} (exists)", report.key),
                EntityState::Failed(reason) => log::warn!(
                    "  {} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    report.key,
                    reason,
                ),
            });
        }
        BatchEvent::Done => pb.finish(),
    };

    let result = run_materialize(&store, kind, out, &materializer, &mut on_event);
    pb.finish();
    let report = result?;

    if let Some(path) = options.report {
        report.write_json(path)?;
        log::info!(
            "  Report written to {}",
            path.display().if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let summary = &report.summary;
    log::info!("");
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} created, {} recreated, {} skipped",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.created,
        summary.recreated,
        summary.skipped,
    );
    if summary.warnings > 0 {
        log::warn!(
            "  {} {} warnings",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.warnings,
        );
    }
    if summary.failed > 0 {
        log::warn!(
            "  {} {} failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed,
        );
        return Err(CliError::Failures(summary.failed));
    }
    Ok(())
}
