//! Baseline price-per-area model.
//!
//! [`LocalityMedianModel`] predicts the median price per square foot of
//! the most specific group that has training data: the locality and
//! bedroom count together, then the locality alone, then the whole
//! dataset. Unknown localities fall through to the global median.
//! [`crate::forest::PriceForestModel`] keeps one as its fallback for
//! localities outside its training set.

use std::collections::BTreeMap;
use std::path::Path;

use house_price_listing::stats::median;
use house_price_listing_models::PreparedListing;
use serde::{Deserialize, Serialize};

use crate::{PredictError, PredictionQuery, PricePredictor};

/// Trained medians for one locality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityStats {
    /// Median price per square foot over every listing in the locality.
    pub median_price_per_area: f64,
    /// Median price per square foot per bedroom count.
    pub by_bhk: BTreeMap<u8, f64>,
    /// Number of training listings.
    pub listing_count: usize,
}

/// Median price per square foot by locality and bedroom count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityMedianModel {
    /// Median over the whole training set.
    pub global_median: f64,
    /// Per-locality medians keyed by locality name.
    pub localities: BTreeMap<String, LocalityStats>,
}

impl LocalityMedianModel {
    /// Fits the model to `listings`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::EmptyDataset`] if `listings` is empty.
    pub fn train(listings: &[PreparedListing]) -> Result<Self, PredictError> {
        let mut all: Vec<f64> = listings.iter().map(|l| l.price_per_area).collect();
        let global_median = median(&mut all).ok_or(PredictError::EmptyDataset)?;

        let mut grouped: BTreeMap<&str, (Vec<f64>, BTreeMap<u8, Vec<f64>>)> = BTreeMap::new();
        for listing in listings {
            let (prices, by_bhk) = grouped.entry(listing.locality.trim()).or_default();
            prices.push(listing.price_per_area);
            if let Some(bhk) = listing.bhk {
                by_bhk.entry(bhk).or_default().push(listing.price_per_area);
            }
        }

        let localities: BTreeMap<String, LocalityStats> = grouped
            .into_iter()
            .filter_map(|(locality, (mut prices, by_bhk))| {
                let listing_count = prices.len();
                let median_price_per_area = median(&mut prices)?;
                let by_bhk = by_bhk
                    .into_iter()
                    .filter_map(|(bhk, mut values)| Some((bhk, median(&mut values)?)))
                    .collect();
                Some((
                    locality.to_owned(),
                    LocalityStats {
                        median_price_per_area,
                        by_bhk,
                        listing_count,
                    },
                ))
            })
            .collect();

        log::info!(
            "Trained locality median model on {} listings across {} localities",
            listings.len(),
            localities.len()
        );

        Ok(Self {
            global_median,
            localities,
        })
    }

    /// Localities seen during training, sorted.
    #[must_use]
    pub fn localities(&self) -> Vec<&str> {
        self.localities.keys().map(String::as_str).collect()
    }

    /// Writes the model as JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), PredictError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Model saved to {}", path.display());
        Ok(())
    }

    /// Reads a model previously written by [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns [`PredictError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let contents = std::fs::read_to_string(path)?;
        let model = serde_json::from_str(&contents)?;
        log::debug!("Model loaded from {}", path.display());
        Ok(model)
    }
}

impl PricePredictor for LocalityMedianModel {
    fn predict(&self, query: &PredictionQuery) -> Result<f64, PredictError> {
        let Some(stats) = self.localities.get(query.locality.trim()) else {
            log::debug!(
                "Unknown locality {:?}; using global median",
                query.locality
            );
            return Ok(self.global_median);
        };

        Ok(query
            .bhk
            .and_then(|bhk| stats.by_bhk.get(&bhk).copied())
            .unwrap_or(stats.median_price_per_area))
    }
}
