// errors.rs
use thiserror::Error;

/// Everything that can go wrong while fetching or extracting a page.
/// Nothing inside the crate recovers from these; they surface to the caller.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// Transport failure or non-success status on a cache-miss fetch.
    #[error("Network error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Missing {field}: {reason}")]
    Extraction { field: &'static str, reason: String },

    #[error("Invalid selector `{0}`")]
    Selector(String),

    #[error("Office {office_id} did not finish paginating within {limit} pages")]
    PageLimit { office_id: String, limit: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    pub fn missing(field: &'static str, reason: impl Into<String>) -> Self {
        ScraperError::Extraction {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
