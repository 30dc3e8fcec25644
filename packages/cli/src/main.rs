#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the house price toolchain.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use house_price_cli::config::MarketsConfig;
use house_price_cli::interactive::{TOLERANCE_PERCENT_RANGE, TOP_K_RANGE};
use house_price_cli::report::{render_estimate, render_suggestions};
use house_price_cli::workflow;
use house_price_listing::dataset::{distinct_localities, read_listings_csv};
use house_price_listing_models::InvalidRowPolicy;
use house_price_predict::evaluate::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION};
use house_price_predict::forest::PriceForestModel;
use house_price_predict::{PredictionQuery, estimate};
use house_price_recommend::recommend;
use house_price_recommend_models::{
    DEFAULT_CLUSTER_COUNT, DEFAULT_PRICE_TOLERANCE, DEFAULT_SEED, DEFAULT_TOP_K, FeatureScaling,
    RecommendParams,
};

#[derive(Parser)]
#[command(
    name = "house_price",
    about = "House price estimates and value-for-money locality suggestions"
)]
struct Cli {
    /// Markets config file (overrides `HOUSE_PRICE_CONFIG` and the built-in list)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw scraper JSON dump into a processed CSV dataset
    BuildDataset {
        /// JSON array of `{title, price_text, area_text}` records
        raw: PathBuf,
        /// Output CSV path
        out: PathBuf,
    },
    /// Train a price model on a processed dataset and report its error
    Train {
        /// Processed CSV dataset
        dataset: PathBuf,
        /// Output model path (JSON)
        model: PathBuf,
        /// Share of listings held out for evaluation
        #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
        /// Shuffle seed for the train/test split
        #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
        seed: u64,
    },
    /// Predict price per sq ft and total price for one home
    Predict {
        /// Trained model (JSON)
        model: PathBuf,
        /// Locality name
        locality: String,
        /// Bedroom count
        bhk: u8,
        /// Floor area in sq ft
        area_sqft: f64,
    },
    /// Suggest localities with more floor area at a comparable price
    Recommend {
        /// Processed CSV dataset
        dataset: PathBuf,
        /// Target locality
        locality: String,
        #[command(flatten)]
        tuning: TuningArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the distinct localities in a dataset
    Localities {
        /// Processed CSV dataset
        dataset: PathBuf,
    },
    /// List configured markets
    Markets,
    /// Predict a price and suggest alternatives using a configured market
    Estimate {
        /// Market id (see `markets`)
        #[arg(long)]
        market: String,
        /// Locality name
        locality: String,
        /// Bedroom count
        bhk: u8,
        /// Floor area in sq ft
        area_sqft: f64,
        /// Price tolerance in percent (5-30)
        #[arg(long, default_value_t = 10)]
        tolerance_percent: u8,
        /// Maximum suggestions (3-10)
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Recommender tuning flags.
#[derive(clap::Args)]
struct TuningArgs {
    /// Fractional price band used when the locality's cluster is small (0.10 = ±10%)
    #[arg(long, default_value_t = DEFAULT_PRICE_TOLERANCE)]
    tolerance: f64,
    /// Maximum number of suggestions
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
    /// Number of k-means clusters
    #[arg(long, default_value_t = DEFAULT_CLUSTER_COUNT)]
    clusters: usize,
    /// Feature scaling before clustering (`raw` or `standardized`)
    #[arg(long, default_value_t = FeatureScaling::Raw)]
    scaling: FeatureScaling,
    /// k-means seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

impl TuningArgs {
    fn params(&self) -> RecommendParams {
        RecommendParams::default()
            .with_price_tolerance(self.tolerance)
            .with_top_k(self.top_k)
            .with_cluster_count(self.clusters)
            .with_scaling(self.scaling)
            .with_seed(self.seed)
    }
}

fn load_config(path: Option<&Path>) -> Result<MarketsConfig, Box<dyn std::error::Error>> {
    Ok(MarketsConfig::load(path)?)
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let config = load_config(cli.config.as_deref())?;
        house_price_cli::interactive::run(&config)?;
        return Ok(());
    };

    match command {
        Commands::BuildDataset { raw, out } => {
            let rows = workflow::build_dataset(&raw, &out)?;
            println!("Saved {rows} rows → {}", out.display());
        }
        Commands::Train {
            dataset,
            model,
            test_fraction,
            seed,
        } => {
            let evaluation = workflow::train(&dataset, &model, test_fraction, seed)?;
            println!(
                "Trained on {} listings, evaluated on {}",
                evaluation.train_count, evaluation.test_count
            );
            if let Some(mae) = evaluation.mean_absolute_error {
                println!("Mean Absolute Error: {mae:.2}");
            }
            println!("Model saved → {}", model.display());
        }
        Commands::Predict {
            model,
            locality,
            bhk,
            area_sqft,
        } => {
            let model = PriceForestModel::load(&model)?;
            let estimate = estimate(&model, &PredictionQuery::new(locality, Some(bhk), area_sqft))?;
            print!("{}", render_estimate(&estimate));
        }
        Commands::Recommend {
            dataset,
            locality,
            tuning,
            json,
        } => {
            let listings = workflow::load_prepared(&dataset, InvalidRowPolicy::Drop)?;
            let suggestions = recommend(&listings, &locality, &tuning.params())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print!("{}", render_suggestions(&suggestions));
            }
        }
        Commands::Localities { dataset } => {
            let listings = read_listings_csv(&dataset)?;
            for locality in distinct_localities(&listings) {
                println!("{locality}");
            }
        }
        Commands::Markets => {
            let config = load_config(cli.config.as_deref())?;
            println!("{:<12} {:<16} DATASET", "ID", "NAME");
            println!("{}", "-".repeat(60));
            for market in &config.markets {
                println!(
                    "{:<12} {:<16} {}",
                    market.id,
                    market.name,
                    market.dataset.display()
                );
            }
        }
        Commands::Estimate {
            market,
            locality,
            bhk,
            area_sqft,
            tolerance_percent,
            top_k,
            json,
        } => {
            if !TOLERANCE_PERCENT_RANGE.contains(&tolerance_percent) {
                return Err(format!(
                    "--tolerance-percent must be between {} and {}",
                    TOLERANCE_PERCENT_RANGE.start(),
                    TOLERANCE_PERCENT_RANGE.end()
                )
                .into());
            }
            if !TOP_K_RANGE.contains(&top_k) {
                return Err(format!(
                    "--top-k must be between {} and {}",
                    TOP_K_RANGE.start(),
                    TOP_K_RANGE.end()
                )
                .into());
            }

            let config = load_config(cli.config.as_deref())?;
            let market = config.market(&market)?;
            let params = RecommendParams::default()
                .with_price_tolerance(f64::from(tolerance_percent) / 100.0)
                .with_top_k(top_k);

            let report = workflow::estimate_market(
                market,
                PredictionQuery::new(locality, Some(bhk), area_sqft),
                &params,
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_estimate(&report.estimate));
                println!();
                println!("Value-for-money localities");
                print!("{}", render_suggestions(&report.suggestions));
            }
        }
    }

    Ok(())
}
