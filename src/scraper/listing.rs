// listing.rs
use crate::config::ScraperConfig;
use crate::errors::{Result, ScraperError};
use crate::scraper::fetcher::Fetcher;
use crate::scraper::models::{Listing, ListingDetail};
use crate::scraper::page::{Child, Node, Page, Query};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static TRAILING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)$").unwrap());
static GALLERY_PHOTO: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\["([^"]+\.jpg)"\]"#).unwrap());

/// Builds [`ListingDetail`] records from listing pages.
pub struct ListingExtractor<'f> {
    fetcher: &'f Fetcher,
    site_url: String,
}

impl<'f> ListingExtractor<'f> {
    pub fn new(fetcher: &'f Fetcher, config: &ScraperConfig) -> Self {
        Self {
            fetcher,
            site_url: config.site_url.clone(),
        }
    }

    pub fn listing(&self, listing_id: &str) -> Listing {
        Listing::new(listing_id, self.site_url.as_str())
    }

    /// Fetches the detail page once and extracts every field from it.
    pub fn get_listing_detail(&self, listing_id: &str) -> Result<ListingDetail> {
        let listing = self.listing(listing_id);
        let markup = self.fetcher.fetch(&listing.reinz_url())?;
        extract_listing_detail(&listing, &markup)
    }
}

/// All-or-nothing: the first missing field fails the whole record.
pub fn extract_listing_detail(listing: &Listing, markup: &str) -> Result<ListingDetail> {
    let page = Page::parse(markup);
    let detail = ListingDetail {
        listing_id: listing.listing_id().to_string(),
        title: extract_title(&page)?,
        description: extract_description(&page)?,
        price: extract_price(&page)?,
        agent_id: extract_agent_id(&page)?,
        address: extract_address(&page)?,
        agency_url: extract_agency_url(&page)?,
        reinz_url: listing.reinz_url(),
        photo_urls: extract_photo_urls(&page)?,
    };
    debug!(
        "Listing {}: {} photos",
        detail.listing_id,
        detail.photo_urls.len()
    );
    Ok(detail)
}

fn header_details<'a>(page: &'a Page, field: &'static str) -> Result<Node<'a>> {
    page.require(&Query::tag("div").class("headerDetails"), field)
}

pub fn extract_title(page: &Page) -> Result<String> {
    let heading = header_details(page, "title")?.require(&Query::tag("h1"), "title")?;
    Ok(heading.text())
}

/// Leading text of the price heading; anything nested after it is ignored.
pub fn extract_price(page: &Page) -> Result<String> {
    let heading = header_details(page, "price")?.require(&Query::tag("h3"), "price")?;
    heading
        .children()
        .next()
        .map(|first| first.text().trim().to_string())
        .ok_or_else(|| ScraperError::missing("price", "price heading is empty"))
}

/// Breadcrumb trail with the root crumb dropped.
pub fn extract_address(page: &Page) -> Result<Vec<String>> {
    let breadcrumbs = page.require(&Query::tag("*").id("breadcrumbs"), "address")?;
    Ok(breadcrumbs
        .find_all_matching(&Query::tag("a"))?
        .iter()
        .skip(1)
        .map(Node::text)
        .collect())
}

pub fn extract_description(page: &Page) -> Result<String> {
    let block = page.require(
        &Query::tag("div").attr("class", "description detailsPage"),
        "description",
    )?;
    Ok(block.require(&Query::tag("p"), "description")?.text())
}

/// Digits at the end of a class token on the agent's profile link,
/// e.g. `agent4399` gives `4399`.
pub fn extract_agent_id(page: &Page) -> Result<String> {
    let link = page
        .require(&Query::tag("div").class("agentDetailsBox"), "agent_id")?
        .require(&Query::tag("a"), "agent_id")?;
    link.class_tokens()
        .find_map(|token| TRAILING_DIGITS.captures(token))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ScraperError::missing("agent_id", "no numbered class on agent link"))
}

/// The listing on the agency's own website.
pub fn extract_agency_url(page: &Page) -> Result<String> {
    let link = page
        .require(&Query::tag("span").class("viewMoreDetails"), "agency_url")?
        .require(&Query::tag("a"), "agency_url")?;
    link.attr("href")
        .map(str::to_string)
        .ok_or_else(|| ScraperError::missing("agency_url", "link has no href"))
}

/// Gallery images from inline scripts, in source order, duplicates kept.
pub fn extract_photo_urls(page: &Page) -> Result<Vec<String>> {
    let scripts = page.find_all_matching(&Query::tag("script"))?;
    Ok(scripts
        .iter()
        .filter(|script| script.attr("src").is_none())
        .flat_map(|script| {
            script
                .children()
                .filter_map(|child| match child {
                    Child::Text(text) => Some(text),
                    Child::Element(_) => None,
                })
                .flat_map(|text| GALLERY_PHOTO.captures_iter(text))
                .map(|caps| caps[1].to_string())
                .collect::<Vec<_>>()
        })
        .collect())
}
