//! Expected price-range options offered on the intake form.

use crate::error::CoreError;

/// Label used when a submission carries no price range.
pub const NOT_SPECIFIED: &str = "Not specified";

/// `(value, label)` pairs in the order the form presents them.
pub const PRICE_RANGES: &[(&str, &str)] = &[
    ("under-50", "Under $50"),
    ("50-100", "$50 - $100"),
    ("100-200", "$100 - $200"),
    ("200-300", "$200 - $300"),
    ("300-400", "$300 - $400"),
    ("400-500", "$400 - $500"),
    ("500-700", "$500 - $700"),
    ("700-1000", "$700 - $1,000"),
    ("1000-2000", "$1,000 - $2,000"),
    ("over-2000", "Over $2,000"),
    ("not-sure", "Not sure / Need help estimating"),
];

/// Validate a submitted price-range value.
pub fn validate_price_range(value: &str) -> Result<(), CoreError> {
    if PRICE_RANGES.iter().any(|(v, _)| *v == value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid price range '{value}'"
        )))
    }
}

/// Display label for a stored price-range value.
pub fn price_range_label(value: Option<&str>) -> &'static str {
    value
        .and_then(|v| PRICE_RANGES.iter().find(|(candidate, _)| *candidate == v))
        .map(|(_, label)| *label)
        .unwrap_or(NOT_SPECIFIED)
}
