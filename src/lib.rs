pub mod config;
pub mod errors;
pub mod logger;
pub mod scraper;

#[cfg(test)]
mod tests;

pub use config::ScraperConfig;
pub use errors::{Result, ScraperError};
pub use crate::scraper::{
    Fetcher, Listing, ListingDetail, ListingExtractor, Office, OfficeCatalog, OfficeProfile,
    Position,
};
