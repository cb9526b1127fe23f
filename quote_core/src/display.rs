//! # Display Formatting
//!
//! Turns a [`QuoteResult`] into the strings shown on the quote panel.
//! Money is rounded to whole rupees here and nowhere else, then grouped the
//! Indian way (`Rs.12,34,567`).

use serde::{Deserialize, Serialize};

use crate::calculations::QuoteResult;

/// Currency prefix used on every amount
pub const CURRENCY_SYMBOL: &str = "Rs.";

/// Shown under every priced breakdown
pub const ESTIMATE_DISCLAIMER: &str =
    "Note: This is an estimated price. Contact us for exact pricing including taxes and installation.";

/// Format a rupee amount for display: rounded to the nearest integer
/// (halves away from zero), en-IN digit grouping.
///
/// Non-finite amounts render as the zero amount.
///
/// ```rust
/// use quote_core::display::format_inr;
///
/// assert_eq!(format_inr(28_080.0), "Rs.28,080");
/// assert_eq!(format_inr(1_234_567.5), "Rs.12,34,568");
/// ```
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{}0", CURRENCY_SYMBOL);
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{}{}{}", CURRENCY_SYMBOL, sign, group_en_in(&digits))
}

/// Group an unsigned digit string: last three digits, then pairs.
fn group_en_in(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Per-square-foot rate as configured, unrounded (e.g., "Rs.99.5")
pub fn format_rate(rate: f64) -> String {
    format!("{}{}", CURRENCY_SYMBOL, rate)
}

/// Distance with two decimals, as shown next to the map
pub fn format_km(km: f64) -> String {
    format!("{:.2}", km)
}

/// Strings for the quote panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDisplay {
    /// Headline total (e.g., "Rs.28,080")
    pub total: String,
    /// Cost breakdown lines, empty in the zero state
    pub breakdown: Vec<String>,
    /// Estimate disclaimer, absent in the zero state
    pub note: Option<String>,
}

impl QuoteDisplay {
    /// Blank panel: zero total and no breakdown
    pub fn zero() -> Self {
        QuoteDisplay {
            total: format_inr(0.0),
            breakdown: Vec::new(),
            note: None,
        }
    }

    /// Render a priced quote
    pub fn from_result(result: &QuoteResult) -> Self {
        QuoteDisplay {
            total: format_inr(result.total),
            breakdown: vec![
                format!("Wall Type: {}", result.wall_type.display_name()),
                format!("Perimeter: {:.2} feet", result.perimeter_ft),
                format!("Height: {} feet", result.height_ft),
                format!("Area: {:.2} sq.ft", result.area_sqft),
                format!("Base Rate: {}/sq.ft", format_rate(result.base_rate)),
                format!("Base Cost: {}", format_inr(result.base_cost)),
                format!("Distance: {} km", format_km(result.distance_km)),
                format!(
                    "Shipping Distance: {} km (free up to {} km)",
                    format_km(result.billable_distance_km),
                    result.free_radius_km
                ),
                format!("Shipping Cost: {}", format_inr(result.surcharge)),
            ],
            note: Some(ESTIMATE_DISCLAIMER.to_string()),
        }
    }

    /// Render whatever the calculator produced; no result means the zero state
    pub fn from_outcome(result: Option<&QuoteResult>) -> Self {
        result.map(Self::from_result).unwrap_or_else(Self::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.breakdown.is_empty()
    }
}

impl Default for QuoteDisplay {
    fn default() -> Self {
        QuoteDisplay::zero()
    }
}

impl std::fmt::Display for QuoteDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Estimated Cost: {}", self.total)?;
        if !self.breakdown.is_empty() {
            writeln!(f, "Cost Breakdown:")?;
            for line in &self.breakdown {
                writeln!(f, "  - {}", line)?;
            }
        }
        if let Some(note) = &self.note {
            writeln!(f, "{}", note)?;
        }
        Ok(())
    }
}
