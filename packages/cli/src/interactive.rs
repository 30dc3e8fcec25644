//! Interactive estimate flow.
//!
//! Walks the user through choosing a market, locality, bedroom count and
//! floor area, then prints the price estimate and value-for-money
//! suggestions. Uses `dialoguer` prompts so no flags need memorising.

use dialoguer::{Input, Select};
use house_price_listing_models::InvalidRowPolicy;
use house_price_predict::PredictionQuery;
use house_price_predict::forest::PriceForestModel;
use house_price_recommend_models::RecommendParams;

use crate::CliError;
use crate::config::MarketsConfig;
use crate::report::{render_estimate, render_suggestions};
use crate::workflow::{estimate_with, load_prepared};

/// Allowed bedroom counts.
const BHK_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Allowed floor areas in square feet.
const AREA_RANGE: std::ops::RangeInclusive<f64> = 200.0..=10_000.0;

/// Allowed price tolerance, in percent.
pub const TOLERANCE_PERCENT_RANGE: std::ops::RangeInclusive<u8> = 5..=30;

/// Allowed number of suggestions.
pub const TOP_K_RANGE: std::ops::RangeInclusive<usize> = 3..=10;

fn prompt_in_range<T>(
    prompt: &str,
    default: T,
    range: &std::ops::RangeInclusive<T>,
) -> Result<T, CliError>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd + Copy,
{
    let raw: String = Input::new()
        .with_prompt(format!("{prompt} ({}-{})", range.start(), range.end()))
        .default(default.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            match input.trim().parse::<T>() {
                Ok(value) if range.contains(&value) => Ok(()),
                _ => Err(format!(
                    "Enter a value between {} and {}",
                    range.start(),
                    range.end()
                )),
            }
        })
        .interact_text()?;

    Ok(raw.trim().parse().unwrap_or(default))
}

/// Runs the interactive estimate flow once.
///
/// # Errors
///
/// Returns [`CliError`] if a prompt fails or the market's model or
/// dataset cannot be loaded.
pub fn run(config: &MarketsConfig) -> Result<(), CliError> {
    if config.markets.is_empty() {
        println!("No markets configured.");
        return Ok(());
    }

    let market_labels: Vec<&str> = config.markets.iter().map(|m| m.name.as_str()).collect();
    let market_idx = Select::new()
        .with_prompt("City")
        .items(&market_labels)
        .default(0)
        .interact()?;
    let market = &config.markets[market_idx];

    let model = PriceForestModel::load(&market.model)?;
    let listings = load_prepared(&market.dataset, InvalidRowPolicy::Drop)?;

    let localities = model.localities();
    if localities.is_empty() {
        println!("The {} model has no localities.", market.name);
        return Ok(());
    }

    let locality_idx = Select::new()
        .with_prompt("Locality")
        .items(&localities)
        .default(0)
        .max_length(20)
        .interact()?;
    let locality = localities[locality_idx].to_owned();

    let bhk = prompt_in_range("BHK", 2, &BHK_RANGE)?;
    let area_sqft = prompt_in_range("Area (sq ft)", 1000.0, &AREA_RANGE)?;
    let tolerance = prompt_in_range("Price tolerance ± %", 10, &TOLERANCE_PERCENT_RANGE)?;
    let top_k = prompt_in_range("Max suggestions", 5, &TOP_K_RANGE)?;

    let params = RecommendParams::default()
        .with_price_tolerance(f64::from(tolerance) / 100.0)
        .with_top_k(top_k);

    let report = estimate_with(
        &model,
        &listings,
        PredictionQuery::new(locality, Some(bhk), area_sqft),
        &params,
    )?;

    println!();
    print!("{}", render_estimate(&report.estimate));
    println!();
    println!("Value-for-money localities");
    print!("{}", render_suggestions(&report.suggestions));

    Ok(())
}
