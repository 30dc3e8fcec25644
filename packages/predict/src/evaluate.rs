//! Hold-out evaluation for price models.

use house_price_listing_models::PreparedListing;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;
use serde::{Deserialize, Serialize};

use crate::forest::PriceForestModel;
use crate::{PredictError, PredictionQuery, PricePredictor};

/// Default share of listings held out for testing.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default shuffle seed for the train/test split.
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Outcome of [`train_and_evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Listings used for training.
    pub train_count: usize,
    /// Listings held out for testing.
    pub test_count: usize,
    /// Mean absolute error on the held-out listings, in price per square
    /// foot. `None` when nothing was held out.
    pub mean_absolute_error: Option<f64>,
}

/// Shuffles `listings` with `seed` and splits off `ceil(len * test_fraction)`
/// of them as the test set.
///
/// Returns `(train, test)`.
///
/// # Errors
///
/// Returns [`PredictError::InvalidSplit`] unless `0 <= test_fraction < 1`.
pub fn train_test_split(
    listings: &[PreparedListing],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<PreparedListing>, Vec<PreparedListing>), PredictError> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(PredictError::InvalidSplit {
            message: format!("test_fraction must be in [0, 1), got {test_fraction}"),
        });
    }

    let mut shuffled = listings.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let test_count = ((shuffled.len() as f64) * test_fraction).ceil() as usize;
    let test_count = test_count.min(shuffled.len());

    let train = shuffled.split_off(test_count);
    Ok((train, shuffled))
}

/// Mean absolute error of `predictor` over `test`, or `None` if `test`
/// is empty.
///
/// # Errors
///
/// Returns [`PredictError`] if any prediction fails.
pub fn mean_absolute_error(
    predictor: &dyn PricePredictor,
    test: &[PreparedListing],
) -> Result<Option<f64>, PredictError> {
    if test.is_empty() {
        return Ok(None);
    }

    let mut total = 0.0;
    for listing in test {
        let query = PredictionQuery::new(listing.locality.clone(), listing.bhk, listing.area_sqft);
        total += (predictor.predict(&query)? - listing.price_per_area).abs();
    }

    #[allow(clippy::cast_precision_loss)]
    Ok(Some(total / test.len() as f64))
}

/// Splits `listings`, trains a [`PriceForestModel`] on the training
/// part, and scores it on the rest.
///
/// # Errors
///
/// Returns [`PredictError`] if the split parameters are invalid or the
/// training part is empty.
pub fn train_and_evaluate(
    listings: &[PreparedListing],
    test_fraction: f64,
    seed: u64,
) -> Result<(PriceForestModel, Evaluation), PredictError> {
    let (train, test) = train_test_split(listings, test_fraction, seed)?;
    let model = PriceForestModel::train(&train)?;
    let mae = mean_absolute_error(&model, &test)?;

    if let Some(mae) = mae {
        log::info!("Mean Absolute Error: {mae:.2}");
    }

    Ok((
        model,
        Evaluation {
            train_count: train.len(),
            test_count: test.len(),
            mean_absolute_error: mae,
        },
    ))
}
