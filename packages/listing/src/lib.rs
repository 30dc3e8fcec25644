#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing text parsing, cleaning, and dataset preparation.
//!
//! Turns scraped [`RawListing`](house_price_listing_models::RawListing)
//! records into numeric [`Listing`](house_price_listing_models::Listing)
//! rows ([`clean`]), stores them as CSV datasets ([`dataset`]), and
//! validates them into
//! [`PreparedListing`](house_price_listing_models::PreparedListing)
//! records with a derived price per square foot ([`prepare`]).

pub mod clean;
pub mod dataset;
pub mod parsing;
pub mod prepare;
pub mod stats;

/// Errors that can occur while loading or preparing listings.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row failed validation under [`InvalidRowPolicy::Fail`](house_price_listing_models::InvalidRowPolicy::Fail).
    #[error("Invalid listing at row {index}: {reason}")]
    InvalidRow {
        /// Zero-based position of the row in the input.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
}
