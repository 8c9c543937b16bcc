use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_catalog::{MediaKind, RecordStore};
use shelf_lib::check_completeness;

use crate::error::CliError;

/// Run the check command. Incomplete records are advisory, not an error.
pub(crate) fn run_check(store_path: &Path, kind: MediaKind) -> Result<(), CliError> {
    let store = RecordStore::load(store_path)?;
    let incomplete = check_completeness(&store, kind);

    for record in &incomplete {
        log::info!(
            "  {} {} {}",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            record.key,
            format!("missing: {}", record.missing.join(", ")).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if incomplete.is_empty() {
        log::info!(
            "{} All {} record(s) complete",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            store.len(),
        );
    } else {
        log::info!("");
        log::info!(
            "{} of {} record(s) incomplete",
            incomplete.len(),
            store.len(),
        );
    }
    Ok(())
}
