//! Free-text field parsing for scraped listings.
//!
//! Listing portals display prices as `"1.2 Cr"` / `"85 Lac"`, areas as
//! `"1,250 sqft"`, and bury the bedroom count and locality in the title
//! (`"2 BHK Flat for Sale in Whitefield, Bangalore"`).

use std::sync::LazyLock;

use regex::Regex;

/// One crore, in rupees.
const CRORE: f64 = 1e7;

/// One lakh, in rupees.
const LAKH: f64 = 1e5;

/// A number followed by an optional Indian price unit.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(Cr|Lakh|Lac)?").expect("valid regex")
});

/// A number followed by `sqft`, `sq ft` or `sq.ft`.
static AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*sq\.?\s*ft").expect("valid regex")
});

/// A single digit followed by `BHK`.
static BHK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d)\s*BHK").expect("valid regex"));

fn parse_number(s: &str) -> Option<f64> {
    s.replace(',', "").parse::<f64>().ok()
}

/// Parses a displayed price into rupees.
///
/// `Cr` multiplies by 10^7 and `Lac`/`Lakh` by 10^5; a bare number is
/// taken as-is. Returns `None` for empty or unparseable text.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let caps = PRICE_RE.captures(text)?;
    let value = parse_number(caps.get(1)?.as_str())?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit.starts_with('c') => CRORE,
        Some(unit) if unit.starts_with('l') => LAKH,
        _ => 1.0,
    };

    Some(value * multiplier)
}

/// Parses a displayed area into square feet.
#[must_use]
pub fn parse_area(text: &str) -> Option<f64> {
    let caps = AREA_RE.captures(text)?;
    parse_number(caps.get(1)?.as_str())
}

/// Extracts the bedroom count from a listing title.
#[must_use]
pub fn parse_bhk(text: &str) -> Option<u8> {
    BHK_RE.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Extracts the locality from a listing title.
///
/// Takes the text after the first `" in "`, cut at the first comma.
/// Titles without `" in "` use the whole title up to the first comma.
#[must_use]
pub fn parse_locality(title: &str) -> Option<String> {
    let tail = title.split_once(" in ").map_or(title, |(_, rest)| rest);
    let locality = tail.split(',').next().unwrap_or_default().trim();

    if locality.is_empty() {
        None
    } else {
        Some(locality.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parses_crore_price() {
        assert_close(parse_price("₹1.2 Cr"), 12_000_000.0);
    }

    #[test]
    fn parses_lac_price() {
        assert_close(parse_price("85 Lac"), 8_500_000.0);
        assert_close(parse_price("85 lakh"), 8_500_000.0);
    }

    #[test]
    fn parses_bare_price_with_commas() {
        assert_close(parse_price("4,500,000"), 4_500_000.0);
    }

    #[test]
    fn rejects_price_without_digits() {
        assert!(parse_price("").is_none());
        assert!(parse_price("Price on request").is_none());
    }

    #[test]
    fn parses_area_variants() {
        assert_close(parse_area("1,250 sqft"), 1250.0);
        assert_close(parse_area("980 sq ft"), 980.0);
        assert_close(parse_area("Super area 1100.5 Sq.Ft"), 1100.5);
    }

    #[test]
    fn rejects_area_without_unit() {
        assert!(parse_area("1250").is_none());
        assert!(parse_area("").is_none());
    }

    #[test]
    fn parses_bhk_from_title() {
        assert_eq!(parse_bhk("3 BHK Flat for Sale in Hebbal"), Some(3));
        assert_eq!(parse_bhk("2bhk apartment"), Some(2));
        assert_eq!(parse_bhk("Residential Plot in Hebbal"), None);
    }

    #[test]
    fn parses_locality_after_in() {
        assert_eq!(
            parse_locality("2 BHK Flat for Sale in Whitefield, Bangalore").as_deref(),
            Some("Whitefield")
        );
    }

    #[test]
    fn parses_locality_keeps_later_in() {
        assert_eq!(
            parse_locality("Villa in Koramangala 4th Block in town, Bangalore").as_deref(),
            Some("Koramangala 4th Block in town")
        );
    }

    #[test]
    fn parses_locality_without_in() {
        assert_eq!(
            parse_locality(" Jayanagar , Bangalore").as_deref(),
            Some("Jayanagar")
        );
        assert!(parse_locality("Flat in , Bangalore").is_none());
        assert!(parse_locality("").is_none());
    }
}
