use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_catalog::{MediaKind, RecordStore};
use shelf_lib::{IngestOverrides, discover, ingest_discovered};

use crate::error::CliError;

/// Run the scan command: discover, ingest, save.
pub(crate) fn run_scan(
    dir: &Path,
    kind: MediaKind,
    store_path: &Path,
    overrides: IngestOverrides,
) -> Result<(), CliError> {
    let mut store = RecordStore::load_or_default(store_path)?;
    log::info!(
        "Scanning {} for {kind} entities",
        dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let candidates = discover(dir, kind)?;
    if candidates.is_empty() {
        log::warn!(
            "{} Nothing found under {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            dir.display(),
        );
        return Ok(());
    }
    log::debug!("{} candidate(s) discovered", candidates.len());

    let report = ingest_discovered(&mut store, candidates, kind, &overrides);
    store.save(store_path)?;

    for key in &report.added {
        log::info!(
            "  {} {}",
            "+".if_supports_color(Stdout, |t| t.green()),
            key,
        );
    }
    for key in &report.updated {
        log::debug!("  ~ {key}");
    }
    for (old, new) in &report.rekeyed {
        log::info!(
            "  {} {} {}",
            "~".if_supports_color(Stdout, |t| t.cyan()),
            old,
            format!("-> {new}").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for (key, code) in &report.codes_assigned {
        log::info!(
            "  {} {} {}",
            "#".if_supports_color(Stdout, |t| t.cyan()),
            key,
            format!("-> {code}").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for collision in &report.collisions {
        log::warn!(
            "  {} Key collision: '{}' was replaced",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            collision.key,
        );
    }

    log::info!("");
    log::info!(
        "{} {} added, {} updated, {} record(s) in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.added.len(),
        report.updated.len(),
        store.len(),
        store_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
