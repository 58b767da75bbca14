// src/tests/office_tests.rs
use super::utils::{serve_html, test_config, test_fetcher, OFFICE_PAGE1, OFFICE_PAGE2};
use crate::errors::ScraperError;
use crate::scraper::office::{extract_listing_ids, is_last_page};
use crate::scraper::page::Page;
use crate::scraper::{OfficeCatalog, OfficeProfile, Position};
use httpmock::prelude::*;

const PAGE1_IDS: [&str; 3] = ["1671120", "1668032", "1660547"];
const PAGE2_IDS: [&str; 8] = [
    "1650249", "1644095", "1641265", "1641262", "1622767", "1617538", "1241981", "646581",
];

fn expected_profile() -> OfficeProfile {
    OfficeProfile {
        name: "Double Winkel Real Estate Ltd (Licensed: REAA 2008) - Professionals, Paremata"
            .to_string(),
        address: "105 Mana Esplande, Paremata, WELLINGTON".to_string(),
        phone: "04 233 9955".to_string(),
        website: "http://www.doublerealestate.co.nz".to_string(),
        position: Position {
            lat: "-41.09264".to_string(),
            long: "174.8684".to_string(),
        },
    }
}

#[test]
fn catalog_urls_follow_site_layout() {
    let server = MockServer::start();
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    let office = catalog.office("12345");
    assert_eq!(office.office_id(), "12345");
    assert_eq!(
        office.page_url(2),
        format!("{}/profile/office/12345/page2", server.base_url())
    );
}

#[test]
fn office_profile_from_first_page() {
    let server = MockServer::start();
    let page1 = serve_html(&server, "/profile/office/12345/page1", OFFICE_PAGE1);
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    let profile = catalog.get_office_profile("12345").unwrap();

    assert_eq!(profile, expected_profile());
    page1.assert_hits(1);
}

#[test]
fn listing_ids_span_all_pages_in_order() {
    let server = MockServer::start();
    let page1 = serve_html(&server, "/profile/office/12345/page1", OFFICE_PAGE1);
    let page2 = serve_html(&server, "/profile/office/12345/page2", OFFICE_PAGE2);
    let page3 = serve_html(&server, "/profile/office/12345/page3", OFFICE_PAGE2);
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    let ids = catalog.get_listing_ids("12345").unwrap();

    let expected: Vec<&str> = PAGE1_IDS.iter().chain(PAGE2_IDS.iter()).copied().collect();
    assert_eq!(ids, expected);
    page1.assert_hits(1);
    page2.assert_hits(1);
    page3.assert_hits(0);
}

#[test]
fn profile_and_listing_walk_share_cached_first_page() {
    let server = MockServer::start();
    let page1 = serve_html(&server, "/profile/office/12345/page1", OFFICE_PAGE1);
    serve_html(&server, "/profile/office/12345/page2", OFFICE_PAGE2);
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    catalog.get_office_profile("12345").unwrap();
    catalog.get_listing_ids("12345").unwrap();

    page1.assert_hits(1);
}

#[test]
fn second_page_fixture_ids_and_last_page() {
    let page1 = Page::parse(OFFICE_PAGE1);
    let page2 = Page::parse(OFFICE_PAGE2);

    assert_eq!(extract_listing_ids(&page2).unwrap(), PAGE2_IDS);
    assert!(!is_last_page(&page1).unwrap());
    assert!(is_last_page(&page2).unwrap());
}

#[test]
fn empty_page_ends_walk_even_with_next_link() {
    let server = MockServer::start();
    serve_html(&server, "/profile/office/777/page1", OFFICE_PAGE1);
    serve_html(
        &server,
        "/profile/office/777/page2",
        r#"<html><body><p>No listings</p><a href="/profile/office/777/page3">Next Page</a></body></html>"#,
    );
    let page3 = serve_html(&server, "/profile/office/777/page3", OFFICE_PAGE2);
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    let ids = catalog.get_listing_ids("777").unwrap();

    assert_eq!(ids, PAGE1_IDS);
    page3.assert_hits(0);
}

#[test]
fn office_without_listings_yields_empty_list() {
    let server = MockServer::start();
    serve_html(
        &server,
        "/profile/office/1/page1",
        "<html><body><div id=\"listings\"></div></body></html>",
    );
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    assert!(catalog.get_listing_ids("1").unwrap().is_empty());
}

#[test]
fn endless_next_links_hit_the_page_limit() {
    let server = MockServer::start();
    let pages = server.mock(|when, then| {
        when.method(GET).path_contains("/profile/office/999/page");
        then.status(200).body(OFFICE_PAGE1);
    });
    let mut config = test_config(&server);
    config.max_pages = 3;
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    let err = catalog.get_listing_ids("999").unwrap_err();

    assert!(matches!(
        err,
        ScraperError::PageLimit { ref office_id, limit: 3 } if office_id == "999"
    ));
    pages.assert_hits(3);
}

#[test]
fn missing_page_fails_the_walk() {
    let server = MockServer::start();
    serve_html(&server, "/profile/office/12345/page1", OFFICE_PAGE1);
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    // Page 2 is not mocked, so the server answers 404.
    let result = catalog.get_listing_ids("12345");
    assert!(matches!(result, Err(ScraperError::Fetch(_))));
}

#[test]
fn broken_profile_page_is_an_extraction_error() {
    let server = MockServer::start();
    serve_html(&server, "/profile/office/5/page1", OFFICE_PAGE2);
    let config = test_config(&server);
    let fetcher = test_fetcher(&config);
    let catalog = OfficeCatalog::new(&fetcher, &config);

    // Page two of the catalog carries no website link or map script.
    let result = catalog.get_office_profile("5");
    assert!(matches!(
        result,
        Err(ScraperError::Extraction {
            field: "website",
            ..
        })
    ));
}
