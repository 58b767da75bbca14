// fetcher.rs
use crate::config::ScraperConfig;
use crate::errors::Result;
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Fetches pages over HTTP, caching every body by its exact URL for the
/// lifetime of the instance and keeping network calls at least
/// `throttle_delay` apart.
///
/// Share one `Fetcher` by reference between everything that talks to the
/// site; a fresh instance starts with an empty cache and no throttle history.
pub struct Fetcher {
    client: Client,
    throttle_delay: Duration,
    state: Mutex<FetchState>,
    // Held for the whole of a network fetch: one request in flight at a time.
    network: Mutex<()>,
}

#[derive(Default)]
struct FetchState {
    cache: HashMap<String, String>,
    last_fetch: Option<Instant>,
}

impl Fetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.throttle_delay))
    }

    pub fn with_client(client: Client, throttle_delay: Duration) -> Self {
        Self {
            client,
            throttle_delay,
            state: Mutex::new(FetchState::default()),
            network: Mutex::new(()),
        }
    }

    pub fn throttle_delay(&self) -> Duration {
        self.throttle_delay
    }

    /// Returns the body at `url`, from the cache when it has been seen before.
    pub fn fetch(&self, url: &str) -> Result<String> {
        if let Some(content) = self.cached(url) {
            debug!("Returning cache: {url}");
            return Ok(content);
        }

        let _in_flight = lock(&self.network);

        // Another caller may have fetched it while we waited on the gate.
        if let Some(content) = self.cached(url) {
            debug!("Returning cache: {url}");
            return Ok(content);
        }

        if let Some(wait) = self.throttle_wait() {
            debug!("Throttling: sleeping for {:.3}s", wait.as_secs_f64());
            std::thread::sleep(wait);
        }

        lock(&self.state).last_fetch = Some(Instant::now());
        debug!("Fetching url: {url}");
        let content = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .text()?;

        let mut state = lock(&self.state);
        let entry = state.cache.entry(url.to_string()).or_insert(content);
        Ok(entry.clone())
    }

    pub fn is_cached(&self, url: &str) -> bool {
        lock(&self.state).cache.contains_key(url)
    }

    pub fn cached_len(&self) -> usize {
        lock(&self.state).cache.len()
    }

    fn cached(&self, url: &str) -> Option<String> {
        lock(&self.state).cache.get(url).cloned()
    }

    /// Time left before the next network fetch may start, if any.
    fn throttle_wait(&self) -> Option<Duration> {
        let last_fetch = lock(&self.state).last_fetch?;
        self.throttle_delay
            .checked_sub(last_fetch.elapsed())
            .filter(|wait| !wait.is_zero())
    }
}

// Every write to the guarded state is a single insert or assignment, so a
// panic elsewhere never leaves it half-updated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
