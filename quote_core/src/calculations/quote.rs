//! # Wall Quote Calculation
//!
//! Prices a wall from its plot dimensions, wall type and delivery distance.
//!
//! ## Procedure
//!
//! 1. P = 2(L + B)
//! 2. A = P × H
//! 3. base cost = A × rate(wall type)
//! 4. billable distance = max(0, d − free radius)
//! 5. surcharge = billable distance × A × rate per km per sq.ft
//! 6. total = base cost + surcharge
//!
//! Nothing is rounded here. Rounding happens only when the result is
//! formatted for display.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::quote::{calculate, QuoteInput};
//! use quote_core::pricing::{PriceTable, ShippingPolicy, WallType};
//!
//! let input = QuoteInput {
//!     wall_type: WallType::Boundary,
//!     length_ft: 10.0,
//!     breadth_ft: 8.0,
//!     height_ft: 6.0,
//!     distance_km: 25.0,
//! };
//!
//! let result = calculate(&input, &PriceTable::standard(), &ShippingPolicy::default()).unwrap();
//! assert_eq!(result.area_sqft, 216.0);
//! assert_eq!(result.base_cost, 21_600.0);
//! assert_eq!(result.surcharge, 6_480.0);
//! assert_eq!(result.total, 28_080.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::{perimeter, wall_area};
use crate::errors::{CalcResult, QuoteError};
use crate::pricing::{PriceTable, ShippingPolicy, WallType};
use crate::units::{Feet, Kilometers, Rupees, SqFt};

/// Complete, typed input for one quotation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "wall_type": "boundary",
///   "length_ft": 10.0,
///   "breadth_ft": 8.0,
///   "height_ft": 6.0,
///   "distance_km": 25.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// Wall type, selects the base rate
    pub wall_type: WallType,

    /// Plot length in feet
    pub length_ft: f64,

    /// Plot breadth in feet
    pub breadth_ft: f64,

    /// Wall height in feet
    pub height_ft: f64,

    /// Delivery distance from the factory in km (0 when no location is selected)
    #[serde(default)]
    pub distance_km: f64,
}

impl QuoteInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("length_ft", self.length_ft),
            ("breadth_ft", self.breadth_ft),
            ("height_ft", self.height_ft),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(QuoteError::invalid_input(
                    field,
                    value.to_string(),
                    "Dimension must be a positive number",
                ));
            }
        }
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(QuoteError::invalid_input(
                "distance_km",
                self.distance_km.to_string(),
                "Distance must be zero or more",
            ));
        }
        Ok(())
    }

    /// Plot perimeter in feet
    pub fn perimeter_ft(&self) -> f64 {
        perimeter(Feet(self.length_ft), Feet(self.breadth_ft)).value()
    }

    /// Wall face area in square feet
    pub fn area_sqft(&self) -> f64 {
        wall_area(Feet(self.perimeter_ft()), Feet(self.height_ft)).value()
    }
}

/// Priced quotation. All money values are unrounded rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Wall type that was priced
    pub wall_type: WallType,
    /// Height the area was computed with (ft)
    pub height_ft: f64,
    /// P = 2(L + B) (ft)
    pub perimeter_ft: f64,
    /// A = P × H (sq.ft)
    pub area_sqft: f64,
    /// Base rate used (Rs./sq.ft)
    pub base_rate: f64,
    /// A × base rate (Rs.)
    pub base_cost: f64,
    /// Measured delivery distance (km)
    pub distance_km: f64,
    /// Distance beyond the free radius (km)
    pub billable_distance_km: f64,
    /// Free delivery radius the surcharge was computed against (km)
    pub free_radius_km: f64,
    /// Delivery surcharge (Rs.)
    pub surcharge: f64,
    /// base cost + surcharge (Rs.)
    pub total: f64,
}

/// Price a wall.
///
/// Pure function of the input, the rate card and the shipping policy.
///
/// # Errors
///
/// * `InvalidInput` - a dimension is not a positive finite number, or the
///   distance is negative / not finite
/// * `InvalidSelection` - the price table has no rate for the wall type
pub fn calculate(input: &QuoteInput, table: &PriceTable, shipping: &ShippingPolicy) -> CalcResult<QuoteResult> {
    input.validate()?;
    let base_rate = table.rate_for(input.wall_type)?;

    let perimeter_ft = input.perimeter_ft();
    let area = SqFt(input.area_sqft());
    let base_cost = Rupees(area.value() * base_rate);
    let billable_distance_km = shipping.billable_distance_km(input.distance_km);
    let surcharge = shipping.surcharge_for(Kilometers(input.distance_km), area);
    let total = base_cost + surcharge;

    tracing::debug!(
        wall_type = input.wall_type.key(),
        area_sqft = area.value(),
        distance_km = input.distance_km,
        total = total.value(),
        "Quote recomputed"
    );

    Ok(QuoteResult {
        wall_type: input.wall_type,
        height_ft: input.height_ft,
        perimeter_ft,
        area_sqft: area.value(),
        base_rate,
        base_cost: base_cost.value(),
        distance_km: input.distance_km,
        billable_distance_km,
        free_radius_km: shipping.free_radius_km,
        surcharge: surcharge.value(),
        total: total.value(),
    })
}

/// Raw quote form values as typed by the user.
///
/// Any field may be missing while the user is still filling the form in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteForm {
    /// Selected wall type key, as sent by the form ("boundary", ...)
    pub wall_type: Option<String>,
    pub length_ft: Option<f64>,
    pub breadth_ft: Option<f64>,
    pub height_ft: Option<f64>,
}

impl QuoteForm {
    /// Convert to a typed input using the given delivery distance.
    pub fn to_input(&self, distance_km: f64) -> CalcResult<QuoteInput> {
        let wall_type = match self.wall_type.as_deref().map(str::trim) {
            None | Some("") => return Err(QuoteError::missing_field("wall_type")),
            Some(key) => WallType::from_str_flexible(key)?,
        };
        let length_ft = self.length_ft.ok_or_else(|| QuoteError::missing_field("length_ft"))?;
        let breadth_ft = self.breadth_ft.ok_or_else(|| QuoteError::missing_field("breadth_ft"))?;
        let height_ft = self.height_ft.ok_or_else(|| QuoteError::missing_field("height_ft"))?;

        Ok(QuoteInput {
            wall_type,
            length_ft,
            breadth_ft,
            height_ft,
            distance_km,
        })
    }

    /// Perimeter, once both plot sides are valid
    pub fn perimeter_ft(&self) -> Option<f64> {
        match (self.length_ft, self.breadth_ft) {
            (Some(l), Some(b)) if is_positive(l) && is_positive(b) => {
                Some(perimeter(Feet(l), Feet(b)).value())
            }
            _ => None,
        }
    }

    /// Wall area, once perimeter and height are valid
    pub fn area_sqft(&self) -> Option<f64> {
        match (self.perimeter_ft(), self.height_ft) {
            (Some(p), Some(h)) if is_positive(h) => Some(wall_area(Feet(p), Feet(h)).value()),
            _ => None,
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Price whatever the form currently holds.
///
/// Incomplete or invalid forms yield `None`; the caller shows the zero state.
pub fn evaluate(
    form: &QuoteForm,
    distance_km: f64,
    table: &PriceTable,
    shipping: &ShippingPolicy,
) -> Option<QuoteResult> {
    match form.to_input(distance_km).and_then(|input| calculate(&input, table, shipping)) {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::debug!(code = e.error_code(), "No quote: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(distance_km: f64) -> QuoteInput {
        QuoteInput {
            wall_type: WallType::Boundary,
            length_ft: 10.0,
            breadth_ft: 8.0,
            height_ft: 6.0,
            distance_km,
        }
    }

    fn price(input: &QuoteInput) -> CalcResult<QuoteResult> {
        calculate(input, &PriceTable::standard(), &ShippingPolicy::default())
    }

    #[test]
    fn test_worked_example_within_free_radius() {
        let result = price(&input(0.0)).unwrap();
        assert_eq!(result.perimeter_ft, 36.0);
        assert_eq!(result.area_sqft, 216.0);
        assert_eq!(result.base_cost, 21_600.0);
        assert_eq!(result.billable_distance_km, 0.0);
        assert_eq!(result.surcharge, 0.0);
        assert_eq!(result.total, 21_600.0);
    }

    #[test]
    fn test_worked_example_beyond_free_radius() {
        let result = price(&input(25.0)).unwrap();
        assert_eq!(result.billable_distance_km, 15.0);
        assert_eq!(result.surcharge, 6_480.0);
        assert_eq!(result.total, 28_080.0);
    }

    #[test]
    fn test_no_surcharge_inside_free_radius() {
        for d in [0.0, 0.1, 5.0, 9.999, 10.0] {
            let result = price(&input(d)).unwrap();
            assert_eq!(result.surcharge, 0.0, "distance {}", d);
            assert_eq!(result.total, result.base_cost);
        }
    }

    #[test]
    fn test_total_is_unrounded_sum() {
        let odd = QuoteInput {
            wall_type: WallType::Exterior,
            length_ft: 10.33,
            breadth_ft: 7.77,
            height_ft: 5.1,
            distance_km: 17.891,
        };
        let result = price(&odd).unwrap();
        assert_eq!(result.total, result.base_cost + result.surcharge);
        assert_eq!(result.area_sqft, 2.0 * (10.33 + 7.77) * 5.1);
        assert!(result.total.fract() != 0.0);
    }

    #[test]
    fn test_total_strictly_increases_beyond_free_radius() {
        let mut previous = price(&input(10.0)).unwrap().total;
        for d in [10.5, 11.0, 20.0, 57.3, 400.0] {
            let total = price(&input(d)).unwrap().total;
            assert!(total > previous, "total did not increase at {} km", d);
            previous = total;
        }
    }

    #[test]
    fn test_rates_per_wall_type() {
        for (wall_type, expected) in [
            (WallType::Boundary, 21_600.0),
            (WallType::Exterior, 30_240.0),
            (WallType::Partition, 25_920.0),
        ] {
            let result = price(&QuoteInput { wall_type, ..input(0.0) }).unwrap();
            assert_eq!(result.base_cost, expected);
        }
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = price(&QuoteInput { height_ft: bad, ..input(0.0) }).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
        assert!(price(&input(-0.5)).is_err());
    }

    #[test]
    fn test_unknown_wall_type_in_table() {
        let table = PriceTable::from_rates([(WallType::Exterior, 140.0)]);
        let err = calculate(&input(0.0), &table, &ShippingPolicy::default()).unwrap_err();
        assert_eq!(err, QuoteError::invalid_selection("wall_type", "boundary"));
    }

    #[test]
    fn test_form_missing_wall_type_yields_no_quote() {
        let form = QuoteForm {
            wall_type: None,
            length_ft: Some(10.0),
            breadth_ft: Some(8.0),
            height_ft: Some(6.0),
        };
        assert!(evaluate(&form, 0.0, &PriceTable::standard(), &ShippingPolicy::default()).is_none());
        assert_eq!(form.to_input(0.0).unwrap_err(), QuoteError::missing_field("wall_type"));
    }

    #[test]
    fn test_form_unknown_wall_type() {
        let form = QuoteForm {
            wall_type: Some("fence".to_string()),
            ..QuoteForm::default()
        };
        assert_eq!(form.to_input(0.0).unwrap_err().error_code(), "INVALID_SELECTION");
    }

    #[test]
    fn test_form_derived_fields() {
        let mut form = QuoteForm {
            wall_type: Some("partition".to_string()),
            length_ft: Some(10.0),
            breadth_ft: None,
            height_ft: Some(6.0),
        };
        assert_eq!(form.perimeter_ft(), None);
        assert_eq!(form.area_sqft(), None);

        form.breadth_ft = Some(8.0);
        assert_eq!(form.perimeter_ft(), Some(36.0));
        assert_eq!(form.area_sqft(), Some(216.0));

        let result = evaluate(&form, 12.0, &PriceTable::standard(), &ShippingPolicy::default()).unwrap();
        assert_eq!(result.surcharge, 2.0 * 216.0 * 2.0);
    }

    #[test]
    fn test_input_json_defaults_distance() {
        let json = r#"{"wall_type":"exterior","length_ft":10,"breadth_ft":8,"height_ft":6}"#;
        let parsed: QuoteInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.wall_type, WallType::Exterior);
        assert_eq!(parsed.distance_km, 0.0);
    }
}
