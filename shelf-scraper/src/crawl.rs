//! Listing-then-detail crawl of a companion website.

use std::collections::HashSet;

use shelf_catalog::{MediaKind, RecordStore, display_key};

use crate::client::Fetch;
use crate::error::ScrapeError;
use crate::log::{LogEntry, ScrapeLog};
use crate::page::{PageScraper, extract_links};

/// What to crawl and how far.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Site root including the scheme, e.g. `https://example.com`.
    pub website: String,
    /// Listing path under the root, e.g. `videos`.
    pub category: String,
    /// Href prefixes that mark detail links on listing pages, e.g. `/video/`.
    pub prefixes: Vec<String>,
    /// Listing pages to read, starting at `?page=0`.
    pub max_pages: usize,
    pub kind: MediaKind,
}

impl CrawlOptions {
    pub fn new(website: impl Into<String>, category: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            website: website.into(),
            category: category.into(),
            prefixes: Vec::new(),
            max_pages: 50,
            kind,
        }
    }

    fn root(&self) -> &str {
        self.website.trim_end_matches('/')
    }

    pub fn listing_url(&self, page: usize) -> String {
        format!(
            "{}/{}?page={page}",
            self.root(),
            self.category.trim_matches('/')
        )
    }

    /// Absolute URL for a detail href found on a listing page.
    pub fn entry_url(&self, href: &str) -> String {
        if href.contains("://") {
            href.to_string()
        } else {
            format!("{}/{}", self.root(), href.trim_start_matches('/'))
        }
    }
}

/// Progress events emitted during a crawl.
#[derive(Debug, Clone)]
pub enum ScrapeEvent {
    PageListed {
        page: usize,
        url: String,
        new_entries: usize,
    },
    ListingComplete {
        total: usize,
    },
    EntryStarted {
        index: usize,
        url: String,
    },
    EntryScraped {
        index: usize,
        url: String,
        key: String,
    },
    /// The entry was skipped (non-fatal for the crawl).
    EntryFailed {
        index: usize,
        url: String,
        message: String,
    },
}

/// Everything a crawl produced. Records are sparse: only fields the pages
/// yielded are present.
#[derive(Debug, Default)]
pub struct ScrapeRun {
    pub records: RecordStore,
    pub log: ScrapeLog,
}

/// Walk the listing pages and collect unique detail hrefs in first-seen
/// order. Listing stops early at a page that adds nothing new. A listing page
/// that cannot be fetched aborts the crawl.
pub fn list_entries(
    fetcher: &dyn Fetch,
    options: &CrawlOptions,
    on_event: &mut dyn FnMut(ScrapeEvent),
) -> Result<Vec<String>, ScrapeError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for page in 0..options.max_pages {
        let url = options.listing_url(page);
        let html = fetcher.fetch_text(&url)?;
        let before = entries.len();
        for href in extract_links(&html, &options.prefixes) {
            if seen.insert(href.clone()) {
                entries.push(href);
            }
        }
        let new_entries = entries.len() - before;
        log::debug!("Listing page {page}: {new_entries} new entries");
        on_event(ScrapeEvent::PageListed {
            page,
            url,
            new_entries,
        });
        if new_entries == 0 {
            break;
        }
    }
    Ok(entries)
}

/// Crawl listings, then scrape every detail page into a record keyed by its
/// display key. Per-entry failures are logged and skipped.
pub fn scrape_all(
    fetcher: &dyn Fetch,
    scraper: &dyn PageScraper,
    options: &CrawlOptions,
    on_event: &mut dyn FnMut(ScrapeEvent),
) -> Result<ScrapeRun, ScrapeError> {
    let entries = list_entries(fetcher, options, on_event)?;
    on_event(ScrapeEvent::ListingComplete {
        total: entries.len(),
    });

    let mut run = ScrapeRun::default();
    for (index, href) in entries.iter().enumerate() {
        let url = options.entry_url(href);
        on_event(ScrapeEvent::EntryStarted {
            index,
            url: url.clone(),
        });

        let scraped = fetcher
            .fetch_text(&url)
            .and_then(|html| scraper.scrape(&url, &html, options.kind));
        match scraped {
            Ok(record) => {
                let key = display_key(&record, options.kind);
                if run.records.insert(key.clone(), record).is_some() {
                    run.log.add(LogEntry::Collision {
                        url: url.clone(),
                        key: key.clone(),
                    });
                } else {
                    run.log.add(LogEntry::Scraped {
                        url: url.clone(),
                        key: key.clone(),
                    });
                }
                on_event(ScrapeEvent::EntryScraped { index, url, key });
            }
            Err(e) => {
                log::warn!("Skipping {url}: {e}");
                let message = e.to_string();
                run.log.add(LogEntry::Failed {
                    url: url.clone(),
                    message: message.clone(),
                });
                on_event(ScrapeEvent::EntryFailed {
                    index,
                    url,
                    message,
                });
            }
        }
    }
    Ok(run)
}

#[cfg(test)]
#[path = "tests/crawl_tests.rs"]
mod tests;
