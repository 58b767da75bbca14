use crate::config::ScraperConfig;
use crate::scraper::Fetcher;
use httpmock::prelude::*;
use httpmock::Mock;
use std::time::Duration;

pub const OFFICE_PAGE1: &str = include_str!("fixtures/office_page1.html");
pub const OFFICE_PAGE2: &str = include_str!("fixtures/office_page2.html");
pub const LISTING_PAGE: &str = include_str!("fixtures/listing_page.html");

/// Config pointing at the mock site, with no throttle so tests stay fast.
pub fn test_config(server: &MockServer) -> ScraperConfig {
    ScraperConfig {
        site_url: server.base_url(),
        throttle_delay: Duration::ZERO,
        ..ScraperConfig::default()
    }
}

/// A fresh fetcher: empty cache, no throttle history.
pub fn test_fetcher(config: &ScraperConfig) -> Fetcher {
    Fetcher::new(config).unwrap_or_else(|e| panic!("Fetcher init failed: {e}"))
}

/// Serves `body` as HTML on GET `path`.
pub fn serve_html<'a>(server: &'a MockServer, path: &str, body: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(body);
    })
}
