use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_catalog::{MatchMethod, ReconcileOptions, RecordStore, reconcile_stores};

use crate::error::CliError;

/// Run the merge command: fold `addition_path` into `base_path`.
pub(crate) fn run_merge(
    base_path: &Path,
    addition_path: &Path,
    out: Option<&Path>,
    insert_unmatched: bool,
) -> Result<(), CliError> {
    let mut base = RecordStore::load(base_path)?;
    let additions = RecordStore::load(addition_path)?;

    let report = reconcile_stores(&mut base, &additions, &ReconcileOptions { insert_unmatched });
    let target = out.unwrap_or(base_path);
    base.save(target)?;

    for matched in &report.matched {
        log::debug!(
            "  {} -> {} ({})",
            matched.addition_key,
            matched.base_key,
            matched.method,
        );
    }
    for key in &report.unmatched {
        if report.inserted.contains(key) {
            log::info!("  {} {}", "+".if_supports_color(Stdout, |t| t.green()), key);
        } else {
            log::warn!(
                "  {} {}: no matching record",
                "?".if_supports_color(Stdout, |t| t.yellow()),
                key,
            );
        }
    }
    for collision in &report.collisions {
        log::warn!(
            "  {} Key collision: '{}' was replaced",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            collision.key,
        );
    }

    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} merged (code: {}, exact: {}, normalized: {}, fallback: {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.matched.len(),
        report.count_by(MatchMethod::Code),
        report.count_by(MatchMethod::Exact),
        report.count_by(MatchMethod::Normalized),
        report.count_by(MatchMethod::Fallback),
    );
    if !report.inserted.is_empty() {
        log::info!(
            "  {} {} inserted",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            report.inserted.len(),
        );
    }
    let skipped = report.unmatched.len() - report.inserted.len();
    if skipped > 0 {
        log::warn!(
            "  {} {} unmatched (use --insert-unmatched to add them)",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            skipped,
        );
    }
    log::info!(
        "  Written to {}",
        target.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
