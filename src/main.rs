use clap::Parser;
use reinz_scraper::logger::init_logger;
use reinz_scraper::{Fetcher, ListingExtractor, OfficeCatalog, ScraperConfig};
use serde::Serialize;
use tracing::{error, info};

const OFFICES: &[(&str, &str)] = &[
    ("Porirua", "3521"),
    ("Paremata", "3551"),
    ("Tawa", "3534"),
    ("Whitby", "3541"),
    ("Otaki", "1756"),
    ("Waikanae", "1703"),
    ("Paraparaumu", "1663"),
];

#[derive(Parser)]
#[command(name = "reinz_scraper")]
#[command(about = "Walks a realestate.co.nz office: profile, listing ids, listing details")]
struct Args {
    /// Office name from the built-in table, or a raw office id
    #[arg(default_value = "Porirua")]
    office: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Table names resolve case-insensitively; anything else is taken as an id.
    fn office_id(&self) -> String {
        OFFICES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&self.office))
            .map(|(_, id)| id.to_string())
            .unwrap_or_else(|| self.office.clone())
    }
}

fn main() {
    let args = Args::parse();

    // 1️⃣ Settings from the environment, flags on top
    let mut config = match ScraperConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(2);
        }
    };
    config.verbose |= args.verbose;
    init_logger(config.verbose);

    // 2️⃣ Office to walk
    let office_id = args.office_id();

    // 3️⃣ One fetcher shared by everything, so the cache and throttle are too
    if let Err(e) = run(&config, &office_id) {
        error!("Scrape of office {office_id} failed: {e}");
        std::process::exit(1);
    }
    info!("✅ Scrape complete");
}

fn run(config: &ScraperConfig, office_id: &str) -> reinz_scraper::Result<()> {
    let fetcher = Fetcher::new(config)?;
    let catalog = OfficeCatalog::new(&fetcher, config);
    let listings = ListingExtractor::new(&fetcher, config);

    println!("Office: {office_id}");
    print_json(&catalog.get_office_profile(office_id)?);

    println!("\nListing IDs for this office:");
    let listing_ids = catalog.get_listing_ids(office_id)?;
    print_json(&listing_ids);

    println!("\nDetails of those listings:");
    for listing_id in &listing_ids {
        println!("Listing: {listing_id}");
        print_json(&listings.get_listing_detail(listing_id)?);
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Could not serialize record: {e}"),
    }
}
