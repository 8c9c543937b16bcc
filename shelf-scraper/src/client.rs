use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use shelf_frontend::{CoverFetcher, MaterializeError};

use crate::error::ScrapeError;

pub const DEFAULT_USER_AGENT: &str = concat!("media-shelf/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounded retries with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_secs(5),
        }
    }
}

/// Randomized pause between consecutive requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Politeness {
    pub min: Duration,
    pub max: Duration,
}

impl Politeness {
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// A delay in `min..=max`; `min` when the bounds are inverted or equal.
    pub fn pick(&self) -> Duration {
        if self.max <= self.min {
            self.min
        } else {
            rand::thread_rng().gen_range(self.min..=self.max)
        }
    }
}

impl Default for Politeness {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1000),
            max: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
    pub retry: RetryPolicy,
    pub politeness: Politeness,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
            politeness: Politeness::default(),
        }
    }
}

/// Run `attempt` until it succeeds or the policy is used up, calling `sleep`
/// with the policy delay between attempts. `attempt` receives the 1-based
/// attempt number.
pub fn retry<T>(
    policy: &RetryPolicy,
    url: &str,
    mut attempt: impl FnMut(u32) -> Result<T, ScrapeError>,
    mut sleep: impl FnMut(Duration),
) -> Result<T, ScrapeError> {
    let max = policy.max_attempts.max(1);
    let mut last = String::new();
    for n in 1..=max {
        match attempt(n) {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!("Attempt {n}/{max} for {url} failed: {e}");
                last = e.to_string();
                if n < max {
                    sleep(policy.delay);
                }
            }
        }
    }
    Err(ScrapeError::Exhausted {
        url: url.to_string(),
        attempts: max,
        last,
    })
}

/// Source of page bodies. The crawler only ever talks to this.
pub trait Fetch {
    fn fetch_text(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Blocking HTTP client with retries and a politeness delay.
pub struct HttpClient {
    http: reqwest::blocking::Client,
    retry: RetryPolicy,
    politeness: Politeness,
    last_request: Cell<Option<Instant>>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ScrapeError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self {
            http,
            retry: config.retry,
            politeness: config.politeness,
            last_request: Cell::new(None),
        })
    }

    /// GET `url` as text, retrying per policy.
    pub fn fetch_with_retry(&self, url: &str) -> Result<String, ScrapeError> {
        retry(
            &self.retry,
            url,
            |n| {
                log::debug!("Fetching (attempt {n}): {url}");
                Ok(self.get(url)?.text()?)
            },
            thread::sleep,
        )
    }

    /// GET `url` as raw bytes, retrying per policy.
    pub fn fetch_bytes_with_retry(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        retry(
            &self.retry,
            url,
            |_| Ok(self.get(url)?.bytes()?.to_vec()),
            thread::sleep,
        )
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, ScrapeError> {
        self.wait_politely();
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    /// Sleep out the rest of a randomized gap since the previous request.
    fn wait_politely(&self) {
        if let Some(last) = self.last_request.get() {
            let wanted = self.politeness.pick();
            let elapsed = last.elapsed();
            if elapsed < wanted {
                thread::sleep(wanted - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl Fetch for HttpClient {
    fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        self.fetch_with_retry(url)
    }
}

/// Remote covers are best effort: an exhausted download surfaces as a soft
/// fetch error on the entity.
impl CoverFetcher for HttpClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MaterializeError> {
        self.fetch_bytes_with_retry(url)
            .map_err(|e| MaterializeError::fetch(url, e.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
