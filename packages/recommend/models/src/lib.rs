#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Types for the value-for-money locality recommender.
//!
//! A [`LocalityProfile`] summarises every listing in one locality by its
//! median price per square foot and median area. The recommender groups
//! profiles by similarity and emits [`Suggestion`]s: localities that
//! offer more floor area than the target at a comparable price.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default fractional price band used when the target's cluster is too
/// small (`0.10` = ±10%).
pub const DEFAULT_PRICE_TOLERANCE: f64 = 0.10;

/// Default maximum number of suggestions.
pub const DEFAULT_TOP_K: usize = 5;

/// Default number of clusters requested from k-means.
pub const DEFAULT_CLUSTER_COUNT: usize = 4;

/// Default seed for k-means initialisation.
pub const DEFAULT_SEED: u64 = 42;

/// Clusters smaller than this are replaced by the price-band candidates.
pub const DEFAULT_MIN_CLUSTER_CANDIDATES: usize = 3;

/// Per-locality summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityProfile {
    /// Locality name, unique within a profile table.
    pub locality: String,
    /// Median price per square foot across the locality's listings.
    pub median_price_per_area: f64,
    /// Median floor area across the locality's listings.
    pub median_area: f64,
    /// Number of listings summarised.
    pub listing_count: usize,
}

/// One recommended alternative locality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// The suggested locality.
    pub recommended_locality: String,
    /// Its median price per square foot.
    pub median_price_per_area: f64,
    /// Its median floor area.
    pub median_area: f64,
    /// `median_area` minus the target's median area. Always positive.
    pub area_gain: f64,
}

/// How profile features are scaled before clustering.
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
pub enum FeatureScaling {
    /// Cluster on raw units (rupees per sq ft, sq ft).
    #[default]
    Raw,
    /// Standardise each feature to zero mean and unit variance first.
    Standardized,
}

/// Tunable parameters for a recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendParams {
    /// Fractional price band for the fallback candidate set. Must be `>= 0`.
    pub price_tolerance: f64,
    /// Maximum number of suggestions. Must be `>= 1`.
    pub top_k: usize,
    /// Requested cluster count. Must be `>= 1`; capped at the number of
    /// distinct localities.
    pub cluster_count: usize,
    /// Seed for k-means initialisation.
    pub seed: u64,
    /// Minimum cluster size before falling back to the price band.
    pub min_cluster_candidates: usize,
    /// Feature scaling applied before clustering.
    pub scaling: FeatureScaling,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            price_tolerance: DEFAULT_PRICE_TOLERANCE,
            top_k: DEFAULT_TOP_K,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            seed: DEFAULT_SEED,
            min_cluster_candidates: DEFAULT_MIN_CLUSTER_CANDIDATES,
            scaling: FeatureScaling::Raw,
        }
    }
}

impl RecommendParams {
    /// Sets the fallback price tolerance.
    #[must_use]
    pub const fn with_price_tolerance(mut self, price_tolerance: f64) -> Self {
        self.price_tolerance = price_tolerance;
        self
    }

    /// Sets the maximum number of suggestions.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the requested cluster count.
    #[must_use]
    pub const fn with_cluster_count(mut self, cluster_count: usize) -> Self {
        self.cluster_count = cluster_count;
        self
    }

    /// Sets the k-means seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the feature scaling mode.
    #[must_use]
    pub const fn with_scaling(mut self, scaling: FeatureScaling) -> Self {
        self.scaling = scaling;
        self
    }
}
