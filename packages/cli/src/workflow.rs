//! End-to-end operations shared by the subcommands and interactive mode.

use std::path::Path;

use house_price_listing::{clean, dataset, prepare};
use house_price_listing_models::{InvalidRowPolicy, PreparedListing};
use house_price_predict::evaluate::{Evaluation, train_and_evaluate};
use house_price_predict::forest::PriceForestModel;
use house_price_predict::{PriceEstimate, PredictionQuery, PricePredictor, estimate};
use house_price_recommend::recommend;
use house_price_recommend_models::{RecommendParams, Suggestion};
use serde::Serialize;

use crate::CliError;
use crate::config::Market;

/// Prediction plus value-for-money suggestions for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    /// What was asked.
    pub query: PredictionQuery,
    /// Predicted price per square foot and total.
    pub estimate: PriceEstimate,
    /// Alternative localities, best first.
    pub suggestions: Vec<Suggestion>,
}

/// Cleans a raw scraper dump and writes it as a processed dataset.
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`CliError`] if reading or writing fails.
pub fn build_dataset(raw_json: &Path, out_csv: &Path) -> Result<usize, CliError> {
    let raw = clean::load_raw_json(raw_json)?;
    let listings = clean::clean(&raw);
    dataset::write_listings_csv(out_csv, &listings)?;
    Ok(listings.len())
}

/// Reads a processed dataset and prepares it for modeling.
///
/// # Errors
///
/// Returns [`CliError`] if the dataset cannot be read, or if `policy` is
/// [`InvalidRowPolicy::Fail`] and a row is invalid.
pub fn load_prepared(
    path: &Path,
    policy: InvalidRowPolicy,
) -> Result<Vec<PreparedListing>, CliError> {
    let listings = dataset::read_listings_csv(path)?;
    Ok(prepare::prepare(&listings, policy)?)
}

/// Trains a model on a dataset, saves it, and returns the hold-out
/// evaluation.
///
/// # Errors
///
/// Returns [`CliError`] if loading, training, or saving fails.
pub fn train(
    dataset_path: &Path,
    model_path: &Path,
    test_fraction: f64,
    seed: u64,
) -> Result<Evaluation, CliError> {
    let listings = load_prepared(dataset_path, InvalidRowPolicy::Drop)?;
    let (model, evaluation) = train_and_evaluate(&listings, test_fraction, seed)?;
    model.save(model_path)?;
    Ok(evaluation)
}

/// Predicts a price and recommends alternatives using an in-memory model
/// and dataset.
///
/// # Errors
///
/// Returns [`CliError`] if prediction or recommendation fails.
pub fn estimate_with(
    predictor: &dyn PricePredictor,
    listings: &[PreparedListing],
    query: PredictionQuery,
    params: &RecommendParams,
) -> Result<EstimateReport, CliError> {
    let estimate = estimate(predictor, &query)?;
    let suggestions = recommend(listings, &query.locality, params)?;

    Ok(EstimateReport {
        query,
        estimate,
        suggestions,
    })
}

/// Loads a market's model and dataset, then runs [`estimate_with`].
///
/// # Errors
///
/// Returns [`CliError`] if either file cannot be loaded or the estimate
/// fails.
pub fn estimate_market(
    market: &Market,
    query: PredictionQuery,
    params: &RecommendParams,
) -> Result<EstimateReport, CliError> {
    log::info!("Using market {} ({})", market.name, market.id);
    let model = PriceForestModel::load(&market.model)?;
    let listings = load_prepared(&market.dataset, InvalidRowPolicy::Drop)?;
    estimate_with(&model, &listings, query, params)
}
