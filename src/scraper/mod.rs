mod fetcher;
pub mod listing;
mod models;
pub mod office;
pub mod page;

pub use fetcher::Fetcher;
pub use listing::ListingExtractor;
pub use models::{Listing, ListingDetail, Office, OfficeProfile, Position};
pub use office::OfficeCatalog;
