#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! House price toolchain: dataset building, model training, price
//! estimates, and value-for-money locality suggestions.
//!
//! The `house_price` binary exposes each step as a subcommand and falls
//! back to an interactive menu ([`interactive`]) when run without one.

pub mod config;
pub mod interactive;
pub mod report;
pub mod workflow;

/// Errors surfaced by the command-line workflows.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Market registry problem.
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// Dataset loading or preparation failed.
    #[error(transparent)]
    Listing(#[from] house_price_listing::ListingError),

    /// Training or prediction failed.
    #[error(transparent)]
    Predict(#[from] house_price_predict::PredictError),

    /// Recommendation failed.
    #[error(transparent)]
    Recommend(#[from] house_price_recommend::RecommendError),

    /// Terminal prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
