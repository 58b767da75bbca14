use serde::Serialize;

// office
//  ├── office_id
//  └── catalog pages: <base>/<office_id>/page1, page2, ...
//
// listing
//  ├── listing_id
//  └── detail page:   <site>/<listing_id>

/// An agency branch and the root of its paginated catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Office {
    office_id: String,
    base_url: String,
}

impl Office {
    /// `base_url` is the catalog root shared by all offices, e.g.
    /// `http://www.realestate.co.nz/profile/office`.
    pub fn new(office_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            office_id: office_id.into(),
            base_url: base_url.into(),
        }
    }

    pub fn office_id(&self) -> &str {
        &self.office_id
    }

    /// Catalog pages are numbered from 1.
    pub fn page_url(&self, page_number: u32) -> String {
        format!("{}/{}/page{}", self.base_url, self.office_id, page_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficeProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub position: Position,
}

/// Map coordinates exactly as written in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub lat: String,
    pub long: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    listing_id: String,
    site_url: String,
}

impl Listing {
    pub fn new(listing_id: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            listing_id: listing_id.into(),
            site_url: site_url.into(),
        }
    }

    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    /// The listing's detail page on the site itself.
    pub fn reinz_url(&self) -> String {
        format!("{}/{}", self.site_url, self.listing_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDetail {
    pub listing_id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub agent_id: String,
    /// Breadcrumb trail, region first, root crumb dropped.
    pub address: Vec<String>,
    /// The listing on the agency's own website.
    pub agency_url: String,
    pub reinz_url: String,
    pub photo_urls: Vec<String>,
}
