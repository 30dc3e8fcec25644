//! Raw scraped listing cleanup.
//!
//! Converts the JSON array written by the scraper into numeric
//! [`Listing`] rows. Rows without a parseable price or area are dropped;
//! a missing bedroom count is kept as `None`.

use std::path::Path;

use house_price_listing_models::{Listing, RawListing};

use crate::ListingError;
use crate::parsing::{parse_area, parse_bhk, parse_locality, parse_price};

/// Reads a JSON array of [`RawListing`] records from disk.
///
/// # Errors
///
/// Returns [`ListingError`] if the file cannot be read or is not a JSON
/// array of listing objects.
pub fn load_raw_json(path: &Path) -> Result<Vec<RawListing>, ListingError> {
    let contents = std::fs::read_to_string(path)?;
    let raw: Vec<RawListing> = serde_json::from_str(&contents)?;
    log::info!("Loaded {} raw listings from {}", raw.len(), path.display());
    Ok(raw)
}

/// Parses a single raw listing, or `None` if price, area or locality
/// cannot be recovered.
#[must_use]
pub fn clean_one(raw: &RawListing) -> Option<Listing> {
    let price = parse_price(&raw.price_text)?;
    let area_sqft = parse_area(&raw.area_text)?;
    let locality = parse_locality(&raw.title)?;

    Some(Listing {
        locality,
        bhk: parse_bhk(&raw.title),
        area_sqft,
        price,
    })
}

/// Parses every raw listing, dropping the ones that cannot be used.
#[must_use]
pub fn clean(raw: &[RawListing]) -> Vec<Listing> {
    let listings: Vec<Listing> = raw
        .iter()
        .filter_map(|r| {
            let cleaned = clean_one(r);
            if cleaned.is_none() {
                log::debug!(
                    "Dropping unparseable listing: title={:?} price={:?} area={:?}",
                    r.title,
                    r.price_text,
                    r.area_text
                );
            }
            cleaned
        })
        .collect();

    log::info!(
        "Cleaned {} of {} raw listings ({} dropped)",
        listings.len(),
        raw.len(),
        raw.len() - listings.len()
    );

    listings
}
