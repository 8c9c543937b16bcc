//! Companion-website scraping: a blocking HTTP client with retries, page
//! field extraction, and the listing/detail crawl that yields records.

pub mod client;
pub mod crawl;
pub mod error;
pub mod log;
pub mod page;

pub use client::{ClientConfig, DEFAULT_USER_AGENT, Fetch, HttpClient, Politeness, RetryPolicy, retry};
pub use crawl::{CrawlOptions, ScrapeEvent, ScrapeRun, list_entries, scrape_all};
pub use error::ScrapeError;
pub use log::{LogEntry, LogSummary, ScrapeLog};
pub use page::{MetaTagScraper, PageScraper, extract_links};
