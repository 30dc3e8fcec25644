//! Market registry configuration.
//!
//! A market pairs a processed listing dataset with a trained price model
//! for one city. The default registry is embedded at compile time from
//! `markets.toml`; a different file can be supplied with `--config` or
//! the `HOUSE_PRICE_CONFIG` environment variable.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming an alternative markets file.
pub const CONFIG_ENV_VAR: &str = "HOUSE_PRICE_CONFIG";

/// Registry embedded at compile time.
const DEFAULT_MARKETS_TOML: &str = include_str!("../markets.toml");

/// Errors that can occur while loading the market registry.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the registry schema.
    #[error("Invalid markets config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Two markets share an id.
    #[error("Duplicate market id: {0}")]
    DuplicateMarket(String),

    /// No market has the requested id.
    #[error("Unknown market '{id}'. Available: {available}")]
    UnknownMarket {
        /// Requested id.
        id: String,
        /// Comma-separated list of configured ids.
        available: String,
    },
}

/// One city's dataset and model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Short identifier used on the command line (e.g., `"bangalore"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Processed listings CSV.
    pub dataset: PathBuf,
    /// Trained model JSON.
    pub model: PathBuf,
}

/// The full market registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketsConfig {
    /// Configured markets, in file order.
    #[serde(rename = "market", default)]
    pub markets: Vec<Market>,
}

impl MarketsConfig {
    /// Parses a registry from TOML text. Relative paths are resolved
    /// against `base_dir` when given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is invalid or ids repeat.
    pub fn parse(toml_str: &str, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config: Self = toml::de::from_str(toml_str)?;

        let mut seen = BTreeSet::new();
        for market in &config.markets {
            if !seen.insert(market.id.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateMarket(market.id.clone()));
            }
        }

        if let Some(base) = base_dir {
            for market in &mut config.markets {
                if market.dataset.is_relative() {
                    market.dataset = base.join(&market.dataset);
                }
                if market.model.is_relative() {
                    market.model = base.join(&market.model);
                }
            }
        }

        Ok(config)
    }

    /// Returns the embedded default registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_MARKETS_TOML, None)
    }

    /// Reads a registry from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path.parent())
    }

    /// Loads the registry from `explicit`, then `HOUSE_PRICE_CONFIG`, then
    /// the embedded default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen source cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::debug!("Loading markets from {}", path.display());
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            log::debug!(
                "Loading markets from {} (via {CONFIG_ENV_VAR})",
                path.display()
            );
            return Self::from_file(&path);
        }

        Self::embedded()
    }

    /// Looks up a market by id (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMarket`] if no market matches.
    pub fn market(&self, id: &str) -> Result<&Market, ConfigError> {
        self.markets
            .iter()
            .find(|m| m.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| ConfigError::UnknownMarket {
                id: id.to_owned(),
                available: self
                    .markets
                    .iter()
                    .map(|m| m.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_registry_parses() {
        let config = MarketsConfig::embedded().unwrap();
        assert!(!config.markets.is_empty());
        for market in &config.markets {
            assert!(!market.id.is_empty(), "market has empty id");
            assert!(!market.name.is_empty(), "market {} has empty name", market.id);
        }
    }

    #[test]
    fn looks_up_market_case_insensitively() {
        let config = MarketsConfig::embedded().unwrap();
        assert_eq!(config.market("BANGALORE").unwrap().name, "Bangalore");
    }

    #[test]
    fn unknown_market_lists_alternatives() {
        let config = MarketsConfig::embedded().unwrap();
        let err = config.market("atlantis").unwrap_err();
        assert!(err.to_string().contains("bangalore"), "{err}");
    }

    #[test]
    fn resolves_relative_paths_against_base_dir() {
        let toml = r#"
            [[market]]
            id = "pune"
            name = "Pune"
            dataset = "data/pune.csv"
            model = "/srv/models/pune.json"
        "#;
        let config = MarketsConfig::parse(toml, Some(Path::new("/etc/house_price"))).unwrap();
        let market = config.market("pune").unwrap();
        assert_eq!(market.dataset, PathBuf::from("/etc/house_price/data/pune.csv"));
        assert_eq!(market.model, PathBuf::from("/srv/models/pune.json"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let toml = r#"
            [[market]]
            id = "pune"
            name = "Pune"
            dataset = "a.csv"
            model = "a.json"

            [[market]]
            id = "pune"
            name = "Pune again"
            dataset = "b.csv"
            model = "b.json"
        "#;
        assert!(matches!(
            MarketsConfig::parse(toml, None),
            Err(ConfigError::DuplicateMarket(id)) if id == "pune"
        ));
    }

    #[test]
    fn rejects_ids_differing_only_in_case() {
        let toml = r#"
            [[market]]
            id = "pune"
            name = "Pune"
            dataset = "a.csv"
            model = "a.json"

            [[market]]
            id = "PUNE"
            name = "Pune again"
            dataset = "b.csv"
            model = "b.json"
        "#;
        assert!(matches!(
            MarketsConfig::parse(toml, None),
            Err(ConfigError::DuplicateMarket(id)) if id == "PUNE"
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let toml = r#"
            [[market]]
            id = "pune"
        "#;
        assert!(matches!(
            MarketsConfig::parse(toml, None),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn reports_missing_file() {
        let err = MarketsConfig::from_file(Path::new("/nonexistent/markets.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(
            err.to_string()
                .starts_with("Failed to read config /nonexistent/markets.toml: "),
            "{err}"
        );
    }
}
