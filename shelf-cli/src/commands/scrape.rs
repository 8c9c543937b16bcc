use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_catalog::RecordStore;
use shelf_lib::{Settings, ingest_scraped};
use shelf_scraper::{CrawlOptions, HttpClient, LogEntry, MetaTagScraper, ScrapeEvent, scrape_all};

use crate::error::CliError;
use crate::logging;
use crate::progress::Progress;

/// Run the scrape command: crawl the site, then fold the records into the store.
pub(crate) fn run_scrape(
    settings: &Settings,
    options: &CrawlOptions,
    store_path: &Path,
    no_log: bool,
) -> Result<(), CliError> {
    // Fail on an unreadable store before spending time on the network.
    let mut store = RecordStore::load_or_default(store_path)?;
    let client = HttpClient::new(settings.network.client_config())?;

    log::info!(
        "Scraping {} from {}",
        options.kind,
        options.listing_url(0).if_supports_color(Stdout, |t| t.cyan()),
    );

    let pb = Progress::new(logging::is_quiet());
    pb.message("Reading listing pages...");
    let mut on_event = |event: ScrapeEvent| match event {
        ScrapeEvent::PageListed {
            page, new_entries, ..
        } => pb.message(format!("Listing page {page}: {new_entries} new")),
        ScrapeEvent::ListingComplete { total } => {
            pb.start_bar(total);
            pb.suspend(|| log::info!("  Found {total} entries"));
        }
        ScrapeEvent::EntryStarted { url, .. } => pb.message(url),
        ScrapeEvent::EntryScraped { key, .. } => {
            pb.inc();
            log::debug!("  scraped {key}");
        }
        ScrapeEvent::EntryFailed { url, message, .. } => {
            pb.inc();
            pb.suspend(|| {
                log::warn!(
                    "  {} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    url,
                    message,
                )
            });
        }
    };

    let run = scrape_all(&client, &MetaTagScraper::default(), options, &mut on_event);
    pb.finish();
    let run = run?;

    for entry in run.log.entries() {
        if let LogEntry::Collision { url, key } = entry {
            log::warn!(
                "  {} {}: key '{}' already scraped, later page wins",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                url,
                key,
            );
        }
    }

    let report = ingest_scraped(&mut store, &run.records, options.kind);
    store.save(store_path)?;

    let summary = run.log.summary();
    log::info!("");
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} pages scraped, {} merged into existing records, {} new",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.scraped,
        report.matched.len(),
        report.inserted.len(),
    );
    if summary.failed > 0 {
        log::warn!(
            "  {} {} errors",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed,
        );
    }

    if !no_log {
        let dir = store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let log_path = dir.join(format!(
            "scrape-log-{}-{}.txt",
            options.kind,
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
        ));
        if let Err(e) = run.log.write_to_file(&log_path) {
            log::warn!("Warning: could not write scrape log: {}", e);
        } else {
            log::info!(
                "  Log written to {}",
                log_path.display().if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}
