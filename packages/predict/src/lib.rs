#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Price-per-area prediction.
//!
//! Callers depend on the narrow [`PricePredictor`] trait so any model
//! (or a fixed stub in tests) can answer "what does a `bhk`-bedroom,
//! `area_sqft` home in `locality` cost per square foot?". The crate
//! ships [`forest::PriceForestModel`], a random forest over locality,
//! bedroom count and area, backed by the simpler
//! [`model::LocalityMedianModel`] for localities it has not seen. The
//! training and evaluation helpers live in [`evaluate`].

pub mod evaluate;
pub mod forest;
pub mod model;

use serde::{Deserialize, Serialize};

/// Errors that can occur during training or prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// I/O error (model file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model file (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Training was attempted without any usable listings.
    #[error("Cannot train on an empty dataset")]
    EmptyDataset,

    /// The regressor could not be fitted or evaluated.
    #[error("Model error: {message}")]
    Model {
        /// Description of what went wrong.
        message: String,
    },

    /// The train/test split parameters are out of range.
    #[error("Invalid split: {message}")]
    InvalidSplit {
        /// Description of what went wrong.
        message: String,
    },

    /// The prediction request itself is unusable.
    #[error("Invalid query: {message}")]
    InvalidQuery {
        /// Description of what went wrong.
        message: String,
    },
}

/// Input features for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionQuery {
    /// Locality name.
    pub locality: String,
    /// Bedroom count, if known.
    pub bhk: Option<u8>,
    /// Floor area in square feet.
    pub area_sqft: f64,
}

impl PredictionQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(locality: impl Into<String>, bhk: Option<u8>, area_sqft: f64) -> Self {
        Self {
            locality: locality.into(),
            bhk,
            area_sqft,
        }
    }
}

/// A predicted price per square foot and the implied total price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    /// Predicted price per square foot.
    pub price_per_area: f64,
    /// `price_per_area * area_sqft`.
    pub total_price: f64,
}

/// Anything that can predict a price per square foot.
pub trait PricePredictor {
    /// Predicts the price per square foot for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError`] if the model cannot answer the query.
    fn predict(&self, query: &PredictionQuery) -> Result<f64, PredictError>;
}

impl<F> PricePredictor for F
where
    F: Fn(&PredictionQuery) -> f64,
{
    fn predict(&self, query: &PredictionQuery) -> Result<f64, PredictError> {
        Ok(self(query))
    }
}

/// Predicts the price per square foot for `query` and derives the total
/// price.
///
/// # Errors
///
/// Returns [`PredictError::InvalidQuery`] if the area is not a finite
/// positive number or the predictor returns a non-finite value.
pub fn estimate(
    predictor: &dyn PricePredictor,
    query: &PredictionQuery,
) -> Result<PriceEstimate, PredictError> {
    if !query.area_sqft.is_finite() || query.area_sqft <= 0.0 {
        return Err(PredictError::InvalidQuery {
            message: format!(
                "area_sqft must be finite and positive, got {}",
                query.area_sqft
            ),
        });
    }

    let price_per_area = predictor.predict(query)?;
    if !price_per_area.is_finite() {
        return Err(PredictError::InvalidQuery {
            message: format!("predictor returned {price_per_area} for {}", query.locality),
        });
    }

    Ok(PriceEstimate {
        price_per_area,
        total_price: price_per_area * query.area_sqft,
    })
}
