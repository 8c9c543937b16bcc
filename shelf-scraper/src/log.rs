use std::path::Path;

/// A single entry in the scrape log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    Scraped {
        url: String,
        key: String,
    },
    /// A scraped record landed on a key another entry of this run already
    /// used; the later one won.
    Collision {
        url: String,
        key: String,
    },
    Failed {
        url: String,
        message: String,
    },
}

/// Collects crawl results and writes a log file.
#[derive(Debug, Default)]
pub struct ScrapeLog {
    entries: Vec<LogEntry>,
}

impl ScrapeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Scraped { .. } => summary.scraped += 1,
                LogEntry::Collision { .. } => {
                    summary.scraped += 1;
                    summary.collisions += 1;
                }
                LogEntry::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        let summary = self.summary();

        writeln!(file, "=== Scrape Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(
            file,
            "Scraped: {} (key collisions: {})",
            summary.scraped, summary.collisions
        )?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Scraped { url, key } => writeln!(file, "[OK] {url} -> \"{key}\"")?,
                LogEntry::Collision { url, key } => {
                    writeln!(file, "[COLLISION] {url} -> \"{key}\" (replaced earlier entry)")?
                }
                LogEntry::Failed { url, message } => writeln!(file, "[ERROR] {url}: {message}")?,
            }
        }

        file.flush()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LogSummary {
    pub scraped: usize,
    pub collisions: usize,
    pub failed: usize,
}
