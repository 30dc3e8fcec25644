//! Random forest price-per-area model.
//!
//! Features are a one-hot encoding of the locality followed by the
//! bedroom count and the floor area, so predictions respond to both the
//! size and the location of a home. Localities the forest never saw are
//! answered by the [`LocalityMedianModel`] trained alongside it.

use std::collections::BTreeSet;
use std::path::Path;

use house_price_listing_models::PreparedListing;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::model::LocalityMedianModel;
use crate::{PredictError, PredictionQuery, PricePredictor};

/// Default number of trees.
pub const DEFAULT_TREE_COUNT: usize = 100;

/// Default bootstrap seed.
pub const DEFAULT_FOREST_SEED: u64 = 42;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub tree_count: usize,
    /// Seed for bootstrap sampling.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            tree_count: DEFAULT_TREE_COUNT,
            seed: DEFAULT_FOREST_SEED,
        }
    }
}

/// Random forest regressor over `(locality one-hot, bhk, area_sqft)`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceForestModel {
    /// One-hot column order. Sorted.
    localities: Vec<String>,
    forest: Forest,
    /// Answers queries for localities outside `localities`.
    fallback: LocalityMedianModel,
}

impl PriceForestModel {
    /// Fits the model with [`ForestParams::default`].
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::EmptyDataset`] if `listings` is empty, or
    /// [`PredictError::Model`] if the forest cannot be fitted.
    pub fn train(listings: &[PreparedListing]) -> Result<Self, PredictError> {
        Self::train_with(listings, ForestParams::default())
    }

    /// Fits the model to `listings`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::EmptyDataset`] if `listings` is empty, or
    /// [`PredictError::Model`] if the forest cannot be fitted.
    pub fn train_with(
        listings: &[PreparedListing],
        params: ForestParams,
    ) -> Result<Self, PredictError> {
        let fallback = LocalityMedianModel::train(listings)?;

        let localities: Vec<String> = listings
            .iter()
            .map(|l| l.locality.trim().to_owned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows: Vec<Vec<f64>> = listings
            .iter()
            .map(|l| {
                let index = find_locality(&localities, &l.locality);
                encode(localities.len(), index, l.bhk, l.area_sqft)
            })
            .collect();
        let targets: Vec<f64> = listings.iter().map(|l| l.price_per_area).collect();

        let feature_count = localities.len() + 2;
        let parameters = RandomForestRegressorParameters::default()
            .with_n_trees(params.tree_count)
            .with_m(feature_count)
            .with_seed(params.seed);

        let x = DenseMatrix::from_2d_vec(&rows);
        let forest =
            RandomForestRegressor::fit(&x, &targets, parameters).map_err(|e| PredictError::Model {
                message: e.to_string(),
            })?;

        log::info!(
            "Trained random forest ({} trees) on {} listings across {} localities",
            params.tree_count,
            listings.len(),
            localities.len()
        );

        Ok(Self {
            localities,
            forest,
            fallback,
        })
    }

    /// Localities seen during training, sorted.
    #[must_use]
    pub fn localities(&self) -> Vec<&str> {
        self.localities.iter().map(String::as_str).collect()
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
        let json = serde_json::to_string(self)?;
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

fn find_locality(localities: &[String], locality: &str) -> Option<usize> {
    localities
        .binary_search_by(|name| name.as_str().cmp(locality.trim()))
        .ok()
}

/// Builds one feature row. An unknown bedroom count is encoded as `0`.
fn encode(
    locality_count: usize,
    locality: Option<usize>,
    bhk: Option<u8>,
    area_sqft: f64,
) -> Vec<f64> {
    let mut row = vec![0.0; locality_count + 2];
    if let Some(idx) = locality {
        row[idx] = 1.0;
    }
    row[locality_count] = f64::from(bhk.unwrap_or(0));
    row[locality_count + 1] = area_sqft;
    row
}

impl PricePredictor for PriceForestModel {
    fn predict(&self, query: &PredictionQuery) -> Result<f64, PredictError> {
        let Some(index) = find_locality(&self.localities, &query.locality) else {
            log::debug!(
                "Unknown locality {:?}; using median fallback",
                query.locality
            );
            return self.fallback.predict(query);
        };

        let row = encode(self.localities.len(), Some(index), query.bhk, query.area_sqft);
        let x = DenseMatrix::from_2d_vec(&vec![row]);
        let predicted = self
            .forest
            .predict(&x)
            .map_err(|e| PredictError::Model {
                message: e.to_string(),
            })?;

        predicted.first().copied().ok_or_else(|| PredictError::Model {
            message: "forest returned no prediction".to_owned(),
        })
    }
}
