//! Per-locality aggregation of prepared listings.

use std::collections::BTreeMap;

use house_price_listing::stats::median;
use house_price_listing_models::PreparedListing;
use house_price_recommend_models::LocalityProfile;

use crate::RecommendError;

fn check_listing(index: usize, listing: &PreparedListing) -> Result<(), RecommendError> {
    let fields = [
        ("area_sqft", listing.area_sqft),
        ("price", listing.price),
        ("price_per_area", listing.price_per_area),
    ];

    for (name, value) in fields {
        if !value.is_finite() || value <= 0.0 {
            return Err(RecommendError::MalformedInput {
                message: format!(
                    "listing {index} ({}) has {name} = {value}; expected a finite positive number",
                    listing.locality
                ),
            });
        }
    }

    Ok(())
}

/// Groups listings by locality and computes median price per square foot
/// and median area for each.
///
/// Profiles are returned sorted by locality name. Locality names are
/// compared after trimming whitespace.
///
/// # Errors
///
/// Returns [`RecommendError::MalformedInput`] if any listing carries a
/// non-finite or non-positive area, price, or price per square foot.
pub fn aggregate(listings: &[PreparedListing]) -> Result<Vec<LocalityProfile>, RecommendError> {
    let mut groups: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for (index, listing) in listings.iter().enumerate() {
        check_listing(index, listing)?;

        let (prices, areas) = groups.entry(listing.locality.trim()).or_default();
        prices.push(listing.price_per_area);
        areas.push(listing.area_sqft);
    }

    let profiles: Vec<LocalityProfile> = groups
        .into_iter()
        .filter_map(|(locality, (mut prices, mut areas))| {
            let listing_count = prices.len();
            Some(LocalityProfile {
                locality: locality.to_owned(),
                median_price_per_area: median(&mut prices)?,
                median_area: median(&mut areas)?,
                listing_count,
            })
        })
        .collect();

    log::debug!(
        "Aggregated {} listings into {} locality profiles",
        listings.len(),
        profiles.len()
    );

    Ok(profiles)
}
