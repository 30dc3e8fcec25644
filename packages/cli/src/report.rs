//! Plain-text rendering of estimates and suggestions.

use house_price_predict::PriceEstimate;
use house_price_recommend_models::Suggestion;

/// Formats a rupee amount rounded to whole rupees with `,` thousands
/// separators (e.g., `1234567.8` -> `"1,234,568"`).
#[must_use]
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);

    for (idx, ch) in rounded.chars().enumerate() {
        if idx > 0 && (rounded.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Renders a price estimate as two lines.
#[must_use]
pub fn render_estimate(estimate: &PriceEstimate) -> String {
    format!(
        "Estimated price per sq ft: ₹ {}\nEstimated total price:     ₹ {}\n",
        format_amount(estimate.price_per_area),
        format_amount(estimate.total_price)
    )
}

/// Renders suggestions as an aligned table, or a short notice when empty.
#[must_use]
pub fn render_suggestions(suggestions: &[Suggestion]) -> String {
    if suggestions.is_empty() {
        return "No better-area suggestions found.\n".to_owned();
    }

    let width = suggestions
        .iter()
        .map(|s| s.recommended_locality.chars().count())
        .max()
        .unwrap_or(0)
        .max("LOCALITY".len());

    let mut out = format!(
        "{:<width$}  {:>14}  {:>12}  {:>12}\n",
        "LOCALITY", "MEDIAN ₹/SQFT", "MEDIAN SQFT", "EXTRA SQFT"
    );
    out.push_str(&"-".repeat(width + 44));
    out.push('\n');

    for s in suggestions {
        out.push_str(&format!(
            "{:<width$}  {:>14}  {:>12}  {:>12}\n",
            s.recommended_locality,
            format_amount(s.median_price_per_area),
            format_amount(s.median_area),
            format_amount(s.area_gain)
        ));
    }

    out
}
