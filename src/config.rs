// config.rs
use crate::errors::{Result, ScraperError};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SITE_URL: &str = "http://www.realestate.co.nz";
pub const DEFAULT_THROTTLE_SECS: u64 = 5;
pub const DEFAULT_MAX_PAGES: u32 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    /// Site root, without a trailing slash.
    pub site_url: String,
    /// Minimum interval between the starts of two network fetches.
    pub throttle_delay: Duration,
    /// Upper bound on catalog pages walked for a single office.
    pub max_pages: u32,
    /// `None` waits on the server forever.
    pub request_timeout: Option<Duration>,
    pub verbose: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            throttle_delay: Duration::from_secs(DEFAULT_THROTTLE_SECS),
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout: None,
            verbose: false,
        }
    }
}

impl ScraperConfig {
    /// Defaults overridden by `REINZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(site_url) = env::var("REINZ_SITE_URL") {
            config.site_url = site_url;
        }
        if let Some(secs) = parse_var::<f64>("REINZ_THROTTLE_SECS")? {
            config.throttle_delay = throttle_from_secs(secs)?;
        }
        if let Some(max_pages) = parse_var::<u32>("REINZ_MAX_PAGES")? {
            config.max_pages = max_pages;
        }
        if let Some(secs) = parse_var::<u64>("REINZ_TIMEOUT_SECS")? {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(verbose) = parse_var::<bool>("REINZ_VERBOSE")? {
            config.verbose = verbose;
        }

        config.validated()
    }

    /// Checks the site URL and strips any trailing slash from it.
    pub fn validated(mut self) -> Result<Self> {
        Url::parse(&self.site_url)
            .map_err(|e| ScraperError::Config(format!("site url `{}`: {e}", self.site_url)))?;
        if self.max_pages == 0 {
            return Err(ScraperError::Config("max_pages must be at least 1".into()));
        }
        let trimmed_len = self.site_url.trim_end_matches('/').len();
        self.site_url.truncate(trimmed_len);
        Ok(self)
    }

    /// Root of every office catalog: `<site>/profile/office`.
    pub fn office_base_url(&self) -> String {
        format!("{}/profile/office", self.site_url)
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(name, env::var(name).ok())
}

fn parse_value<T>(name: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ScraperError::Config(format!("{name}=`{raw}`: {e}"))),
        None => Ok(None),
    }
}

// Negative, NaN and overflowing values are rejected.
fn throttle_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ScraperError::Config(format!("REINZ_THROTTLE_SECS=`{secs}`: {e}")))
}
