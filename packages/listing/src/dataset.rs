//! Processed dataset storage.
//!
//! Datasets are CSV files with the header `locality,bhk,area_sqft,price`.
//! An empty `bhk` cell means the bedroom count is unknown.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use house_price_listing_models::Listing;

use crate::ListingError;

/// Parses listings from any CSV reader.
///
/// # Errors
///
/// Returns [`ListingError::Csv`] if a row is malformed or a required
/// column is missing.
pub fn parse_listings_csv<R: Read>(reader: R) -> Result<Vec<Listing>, ListingError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut listings = Vec::new();
    for result in reader.deserialize() {
        let listing: Listing = result?;
        listings.push(listing);
    }

    Ok(listings)
}

/// Reads a processed dataset from disk.
///
/// # Errors
///
/// Returns [`ListingError`] if the file cannot be opened or parsed.
pub fn read_listings_csv(path: &Path) -> Result<Vec<Listing>, ListingError> {
    let file = std::fs::File::open(path)?;
    let listings = parse_listings_csv(file)?;
    log::info!("Read {} listings from {}", listings.len(), path.display());
    Ok(listings)
}

/// Writes a processed dataset to disk, creating parent directories.
///
/// # Errors
///
/// Returns [`ListingError`] if the file cannot be created or written.
pub fn write_listings_csv(path: &Path, listings: &[Listing]) -> Result<(), ListingError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;

    log::info!("Saved {} rows to {}", listings.len(), path.display());
    Ok(())
}

/// Returns the distinct locality names in the dataset, sorted.
#[must_use]
pub fn distinct_localities(listings: &[Listing]) -> Vec<String> {
    listings
        .iter()
        .map(|l| l.locality.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
locality,bhk,area_sqft,price
Hebbal,2,1000,9000000
Whitefield,,1200.5,8500000
Hebbal,3,1500,14000000
";

    #[test]
    fn parses_dataset_with_missing_bhk() {
        let listings = parse_listings_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].bhk, Some(2));
        assert_eq!(listings[1].bhk, None);
        assert!((listings[1].area_sqft - 1200.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "locality,area_sqft\nHebbal,1000\n";
        assert!(matches!(
            parse_listings_csv(csv.as_bytes()),
            Err(ListingError::Csv(_))
        ));
    }

    #[test]
    fn reads_empty_numeric_cells_as_nan() {
        let csv = "\
locality,bhk,area_sqft,price
Hebbal,2,1000,9000000
Hoodi,2,,6000000
Hoodi,3,900,
";
        let listings = parse_listings_csv(csv.as_bytes()).unwrap();
        assert_eq!(listings.len(), 3);
        assert!(listings[1].area_sqft.is_nan());
        assert!(listings[2].price.is_nan());
    }

    #[test]
    fn rejects_non_numeric_price() {
        let csv = "locality,bhk,area_sqft,price\nHebbal,2,1000,lots\n";
        assert!(parse_listings_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn lists_distinct_localities_sorted() {
        let listings = parse_listings_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(distinct_localities(&listings), vec!["Hebbal", "Whitefield"]);
    }

    #[test]
    fn writes_and_reads_back_dataset() {
        let dir = std::env::temp_dir().join(format!("house_price_dataset_{}", std::process::id()));
        let path = dir.join("nested").join("listings.csv");
        let listings = parse_listings_csv(SAMPLE.as_bytes()).unwrap();

        write_listings_csv(&path, &listings).unwrap();
        let read_back = read_listings_csv(&path).unwrap();
        assert_eq!(read_back, listings);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
