#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Property listing record types.
//!
//! Listings move through three shapes: the free-text [`RawListing`]
//! produced by scraping, the numeric [`Listing`] stored in processed
//! datasets, and the [`PreparedListing`] that carries the derived
//! price-per-area consumed by the model and the recommender.

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A scraped listing before any text parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    /// Listing headline, e.g. `"2 BHK Flat for Sale in Whitefield, Bangalore"`.
    #[serde(default)]
    pub title: String,
    /// Price as displayed, e.g. `"1.2 Cr"` or `"85 Lac"`.
    #[serde(default)]
    pub price_text: String,
    /// Area as displayed, e.g. `"1,250 sqft"`.
    #[serde(default)]
    pub area_text: String,
}

/// Reads an optional number, mapping an empty cell or `null` to NaN so
/// the row reaches validation instead of failing the whole file.
fn nan_if_missing<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// One observed property record with numeric fields.
///
/// A missing `area_sqft` or `price` is read as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Locality (neighbourhood) name.
    pub locality: String,
    /// Bedroom count, when the title mentioned one.
    pub bhk: Option<u8>,
    /// Floor area in square feet.
    #[serde(deserialize_with = "nan_if_missing")]
    pub area_sqft: f64,
    /// Total asking price.
    #[serde(deserialize_with = "nan_if_missing")]
    pub price: f64,
}

impl Listing {
    /// Creates a listing.
    #[must_use]
    pub fn new(locality: impl Into<String>, bhk: Option<u8>, area_sqft: f64, price: f64) -> Self {
        Self {
            locality: locality.into(),
            bhk,
            area_sqft,
            price,
        }
    }
}

/// A validated listing with its derived price per square foot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedListing {
    /// Trimmed locality name.
    pub locality: String,
    /// Bedroom count, if known.
    pub bhk: Option<u8>,
    /// Floor area in square feet. Always finite and positive.
    pub area_sqft: f64,
    /// Total price. Always finite and positive.
    pub price: f64,
    /// `price / area_sqft`.
    pub price_per_area: f64,
}

/// What the dataset preparer does with a row it cannot use.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InvalidRowPolicy {
    /// Skip the row and keep going.
    #[default]
    Drop,
    /// Abort preparation with an error naming the row.
    Fail,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn raw_listing_tolerates_missing_fields() {
        let raw: RawListing = serde_json::from_str(r#"{"title": "Plot in Hebbal"}"#).unwrap();
        assert_eq!(raw.title, "Plot in Hebbal");
        assert!(raw.price_text.is_empty());
        assert!(raw.area_text.is_empty());
    }

    #[test]
    fn listing_reads_missing_numbers_as_nan() {
        let json = r#"{"locality": "Hoodi", "bhk": 2, "area_sqft": null, "price": 6000000}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert!(listing.area_sqft.is_nan());
        assert!((listing.price - 6_000_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_row_policy_parses_case_insensitively() {
        assert_eq!(
            InvalidRowPolicy::from_str("FAIL").unwrap(),
            InvalidRowPolicy::Fail
        );
        assert_eq!(
            InvalidRowPolicy::from_str("drop").unwrap(),
            InvalidRowPolicy::Drop
        );
        assert!(InvalidRowPolicy::from_str("ignore").is_err());
    }

    #[test]
    fn invalid_row_policy_defaults_to_drop() {
        assert_eq!(InvalidRowPolicy::default(), InvalidRowPolicy::Drop);
        assert_eq!(InvalidRowPolicy::Fail.to_string(), "fail");
    }
}
