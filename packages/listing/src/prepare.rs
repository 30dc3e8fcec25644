//! Dataset preparation: validation plus the derived price per square foot.
//!
//! The input slice is never modified; prepared rows are returned as new
//! [`PreparedListing`] values so a shared dataset can be prepared by
//! several callers at once.

use house_price_listing_models::{InvalidRowPolicy, Listing, PreparedListing};

use crate::ListingError;

/// Returns why a listing cannot be prepared, or `None` if it is usable.
fn row_defect(listing: &Listing) -> Option<String> {
    if listing.locality.trim().is_empty() {
        return Some("locality is empty".to_owned());
    }
    if listing.area_sqft.is_nan() {
        return Some("area_sqft is missing".to_owned());
    }
    if listing.price.is_nan() {
        return Some("price is missing".to_owned());
    }
    if !listing.area_sqft.is_finite() || listing.area_sqft <= 0.0 {
        return Some(format!(
            "area_sqft must be finite and positive, got {}",
            listing.area_sqft
        ));
    }
    if !listing.price.is_finite() || listing.price <= 0.0 {
        return Some(format!(
            "price must be finite and positive, got {}",
            listing.price
        ));
    }
    None
}

/// Validates one listing and derives its price per square foot.
///
/// # Errors
///
/// Returns the reason the row is unusable.
pub fn prepare_one(listing: &Listing) -> Result<PreparedListing, String> {
    if let Some(reason) = row_defect(listing) {
        return Err(reason);
    }

    Ok(PreparedListing {
        locality: listing.locality.trim().to_owned(),
        bhk: listing.bhk,
        area_sqft: listing.area_sqft,
        price: listing.price,
        price_per_area: listing.price / listing.area_sqft,
    })
}

/// Prepares every listing according to `policy`.
///
/// # Errors
///
/// Returns [`ListingError::InvalidRow`] for the first unusable row when
/// `policy` is [`InvalidRowPolicy::Fail`].
pub fn prepare(
    listings: &[Listing],
    policy: InvalidRowPolicy,
) -> Result<Vec<PreparedListing>, ListingError> {
    let mut prepared = Vec::with_capacity(listings.len());
    let mut dropped = 0_usize;

    for (index, listing) in listings.iter().enumerate() {
        match prepare_one(listing) {
            Ok(row) => prepared.push(row),
            Err(reason) => match policy {
                InvalidRowPolicy::Fail => {
                    return Err(ListingError::InvalidRow { index, reason });
                }
                InvalidRowPolicy::Drop => {
                    log::debug!("Dropping listing {index}: {reason}");
                    dropped += 1;
                }
            },
        }
    }

    if dropped > 0 {
        log::warn!(
            "Dropped {dropped} of {} listings that failed validation",
            listings.len()
        );
    }

    Ok(prepared)
}
