// office.rs
use crate::config::ScraperConfig;
use crate::errors::{Result, ScraperError};
use crate::scraper::fetcher::Fetcher;
use crate::scraper::models::{Office, OfficeProfile, Position};
use crate::scraper::page::{Node, Page, Query};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Phone:([ 0-9]+)").unwrap());
static LAT_LNG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"LatLng\(\s*(-?[.\d]+)\s*,\s*(-?[.\d]+)\s*\)").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

const NEXT_PAGE: &str = "Next Page";
const WEBSITE_LINK: &str = "View our website";

/// Walks office catalogs through a shared [`Fetcher`].
pub struct OfficeCatalog<'f> {
    fetcher: &'f Fetcher,
    base_url: String,
    max_pages: u32,
}

impl<'f> OfficeCatalog<'f> {
    pub fn new(fetcher: &'f Fetcher, config: &ScraperConfig) -> Self {
        Self {
            fetcher,
            base_url: config.office_base_url(),
            max_pages: config.max_pages,
        }
    }

    pub fn office(&self, office_id: &str) -> Office {
        Office::new(office_id, self.base_url.as_str())
    }

    /// Profile fields come from the first catalog page.
    pub fn get_office_profile(&self, office_id: &str) -> Result<OfficeProfile> {
        let url = self.office(office_id).page_url(1);
        let page = Page::parse(&self.fetcher.fetch(&url)?);
        extract_office_profile(&page)
    }

    /// Every listing id across the office's catalog, page by page, in
    /// document order. Ids are not deduplicated.
    ///
    /// The walk stops at the first page without a "Next Page" link, and also
    /// at the first page with no listing cards even if that page links
    /// onward. Going past `max_pages` is a [`ScraperError::PageLimit`].
    pub fn get_listing_ids(&self, office_id: &str) -> Result<Vec<String>> {
        let office = self.office(office_id);
        let mut listing_ids = Vec::new();

        for page_number in 1..=self.max_pages {
            let page = Page::parse(&self.fetcher.fetch(&office.page_url(page_number))?);
            let found = extract_listing_ids(&page)?;
            let last_page = is_last_page(&page)?;
            info!(
                "Office {office_id} page {page_number}: {} listings",
                found.len()
            );

            if found.is_empty() {
                if !last_page {
                    warn!(
                        "Office {office_id} page {page_number} has no listings but links onward, stopping"
                    );
                }
                return Ok(listing_ids);
            }

            listing_ids.extend(found);
            if last_page {
                return Ok(listing_ids);
            }
        }

        Err(ScraperError::PageLimit {
            office_id: office_id.to_string(),
            limit: self.max_pages,
        })
    }
}

pub fn extract_office_profile(page: &Page) -> Result<OfficeProfile> {
    Ok(OfficeProfile {
        name: extract_name(page)?,
        address: extract_address(page)?,
        phone: extract_phone(page)?,
        website: extract_website(page)?,
        position: extract_position(page)?,
    })
}

fn office_details<'a>(page: &'a Page, field: &'static str) -> Result<Node<'a>> {
    page.require(&Query::tag("div").id("office-details"), field)
}

pub fn extract_name(page: &Page) -> Result<String> {
    let heading = office_details(page, "name")?.require(&Query::tag("h2"), "name")?;
    Ok(heading.text())
}

pub fn extract_address(page: &Page) -> Result<String> {
    let item = office_details(page, "address")?.require(&Query::tag("li"), "address")?;
    Ok(item.text())
}

/// Just the digits and spaces after `Phone:`.
pub fn extract_phone(page: &Page) -> Result<String> {
    let item = page.require(&Query::tag("li").text_matching(&PHONE), "phone")?;
    let text = item.text();
    PHONE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|number| number.as_str().trim().to_string())
        .ok_or_else(|| ScraperError::missing("phone", text.clone()))
}

pub fn extract_website(page: &Page) -> Result<String> {
    let link = page.require(&Query::tag("a").text(WEBSITE_LINK), "website")?;
    link.attr("href")
        .map(str::to_string)
        .ok_or_else(|| ScraperError::missing("website", "link has no href"))
}

/// Coordinates from the map set-up script, kept as the source wrote them.
pub fn extract_position(page: &Page) -> Result<Position> {
    let script = page.require(&Query::tag("script").text_matching(&LAT_LNG), "position")?;
    let text = script.text();
    let caps = LAT_LNG
        .captures(&text)
        .ok_or_else(|| ScraperError::missing("position", "no LatLng call"))?;
    Ok(Position {
        lat: caps[1].trim().to_string(),
        long: caps[2].trim().to_string(),
    })
}

/// Numeric part of each listing card's `id`, in document order.
pub fn extract_listing_ids(page: &Page) -> Result<Vec<String>> {
    page.find_all("div", "listing")?
        .into_iter()
        .map(|card| {
            let id = card
                .attr("id")
                .ok_or_else(|| ScraperError::missing("listing_id", "listing card has no id"))?;
            DIGITS
                .find(id)
                .map(|digits| digits.as_str().to_string())
                .ok_or_else(|| {
                    ScraperError::missing("listing_id", format!("no digits in `{id}`"))
                })
        })
        .collect()
}

/// True when the page has no "Next Page" link.
pub fn is_last_page(page: &Page) -> Result<bool> {
    Ok(page.find_first(&Query::tag("a").text(NEXT_PAGE))?.is_none())
}
