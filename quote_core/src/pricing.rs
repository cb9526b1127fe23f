//! # Pricing Tables
//!
//! Static price configuration: the per-square-foot base rate for each wall
//! type and the delivery surcharge policy.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::pricing::{PriceTable, ShippingPolicy, WallType};
//!
//! let table = PriceTable::standard();
//! assert_eq!(table.rate_for(WallType::Boundary).unwrap(), 100.0);
//!
//! let shipping = ShippingPolicy::default();
//! assert_eq!(shipping.billable_distance_km(25.0), 15.0);
//! assert_eq!(shipping.surcharge(25.0, 216.0), 6480.0);
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, QuoteError};
use crate::units::{Kilometers, Rupees, SqFt};

/// Wall construction types offered on the quote form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    /// Compound / boundary wall
    Boundary,
    /// External building wall
    Exterior,
    /// Internal partition wall
    Partition,
}

impl WallType {
    /// All wall types, in form order
    pub const ALL: [WallType; 3] = [WallType::Boundary, WallType::Exterior, WallType::Partition];

    /// Form key (e.g., "boundary")
    pub fn key(&self) -> &'static str {
        match self {
            WallType::Boundary => "boundary",
            WallType::Exterior => "exterior",
            WallType::Partition => "partition",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WallType::Boundary => "Boundary",
            WallType::Exterior => "Exterior",
            WallType::Partition => "Partition",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "boundary" | "boundary-wall" | "compound" => Ok(WallType::Boundary),
            "exterior" | "exterior-wall" | "external" => Ok(WallType::Exterior),
            "partition" | "partition-wall" | "internal" => Ok(WallType::Partition),
            _ => Err(QuoteError::invalid_selection("wall_type", s)),
        }
    }
}

impl std::fmt::Display for WallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

static STANDARD_RATES: Lazy<BTreeMap<WallType, f64>> = Lazy::new(|| {
    BTreeMap::from([
        (WallType::Boundary, 100.0),
        (WallType::Exterior, 140.0),
        (WallType::Partition, 120.0),
    ])
});

/// Base rate per square foot for each wall type.
///
/// Serializes as a flat map: `{ "boundary": 100.0, "exterior": 140.0, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    rates: BTreeMap<WallType, f64>,
}

impl PriceTable {
    /// The published rate card
    pub fn standard() -> Self {
        PriceTable {
            rates: STANDARD_RATES.clone(),
        }
    }

    /// Build a table from explicit rates
    pub fn from_rates(rates: impl IntoIterator<Item = (WallType, f64)>) -> Self {
        PriceTable {
            rates: rates.into_iter().collect(),
        }
    }

    /// Base rate (Rs./sq.ft) for a wall type
    pub fn rate_for(&self, wall_type: WallType) -> CalcResult<f64> {
        self.rates
            .get(&wall_type)
            .copied()
            .ok_or_else(|| QuoteError::invalid_selection("wall_type", wall_type.key()))
    }

    /// Wall types that have a rate, in order
    pub fn wall_types(&self) -> impl Iterator<Item = WallType> + '_ {
        self.rates.keys().copied()
    }

    /// Every rate must be finite and positive
    pub fn validate(&self) -> CalcResult<()> {
        if self.rates.is_empty() {
            return Err(QuoteError::missing_field("price_table"));
        }
        for (wall_type, rate) in &self.rates {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(QuoteError::invalid_input(
                    format!("price_table.{}", wall_type.key()),
                    rate.to_string(),
                    "Rate must be a positive number",
                ));
            }
        }
        Ok(())
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        PriceTable::standard()
    }
}

/// Delivery surcharge policy.
///
/// The first `free_radius_km` of travel are free; every kilometer beyond it
/// costs `rate_per_km_per_sqft` per square foot of wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Free delivery radius (km)
    pub free_radius_km: f64,
    /// Rs. per sq.ft per km beyond the free radius
    pub rate_per_km_per_sqft: f64,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        ShippingPolicy {
            free_radius_km: 10.0,
            rate_per_km_per_sqft: 2.0,
        }
    }
}

impl ShippingPolicy {
    /// Distance beyond the free radius, never negative
    pub fn billable_distance_km(&self, distance_km: f64) -> f64 {
        (distance_km - self.free_radius_km).max(0.0)
    }

    /// Surcharge for delivering `area_sqft` of wall over `distance_km`
    pub fn surcharge(&self, distance_km: f64, area_sqft: f64) -> f64 {
        self.billable_distance_km(distance_km) * area_sqft * self.rate_per_km_per_sqft
    }

    /// Same as [`surcharge`](Self::surcharge), in unit types
    pub fn surcharge_for(&self, distance: Kilometers, area: SqFt) -> Rupees {
        Rupees(self.surcharge(distance.0, area.0))
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !self.free_radius_km.is_finite() || self.free_radius_km < 0.0 {
            return Err(QuoteError::invalid_input(
                "shipping.free_radius_km",
                self.free_radius_km.to_string(),
                "Free radius must be zero or more",
            ));
        }
        if !self.rate_per_km_per_sqft.is_finite() || self.rate_per_km_per_sqft < 0.0 {
            return Err(QuoteError::invalid_input(
                "shipping.rate_per_km_per_sqft",
                self.rate_per_km_per_sqft.to_string(),
                "Rate must be zero or more",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rates() {
        let table = PriceTable::standard();
        assert_eq!(table.rate_for(WallType::Boundary).unwrap(), 100.0);
        assert_eq!(table.rate_for(WallType::Exterior).unwrap(), 140.0);
        assert_eq!(table.rate_for(WallType::Partition).unwrap(), 120.0);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_missing_rate_is_invalid_selection() {
        let table = PriceTable::from_rates([(WallType::Boundary, 100.0)]);
        let err = table.rate_for(WallType::Partition).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SELECTION");
    }

    #[test]
    fn test_wall_type_parsing() {
        assert_eq!(WallType::from_str_flexible("Boundary").unwrap(), WallType::Boundary);
        assert_eq!(WallType::from_str_flexible(" exterior ").unwrap(), WallType::Exterior);
        assert_eq!(WallType::from_str_flexible("partition_wall").unwrap(), WallType::Partition);
        assert!(WallType::from_str_flexible("").is_err());
        assert!(WallType::from_str_flexible("fence").is_err());
    }

    #[test]
    fn test_table_serializes_as_flat_map() {
        let json = serde_json::to_string(&PriceTable::standard()).unwrap();
        assert_eq!(json, r#"{"boundary":100.0,"exterior":140.0,"partition":120.0}"#);
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let table = PriceTable::from_rates([(WallType::Boundary, 0.0)]);
        assert!(table.validate().is_err());
        let table = PriceTable::from_rates([(WallType::Boundary, f64::NAN)]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_free_radius() {
        let policy = ShippingPolicy::default();
        for d in [0.0, 3.5, 9.99, 10.0] {
            assert_eq!(policy.billable_distance_km(d), 0.0);
            assert_eq!(policy.surcharge(d, 216.0), 0.0);
        }
        assert_eq!(policy.billable_distance_km(10.5), 0.5);
    }

    #[test]
    fn test_surcharge_units() {
        let policy = ShippingPolicy::default();
        let cost = policy.surcharge_for(Kilometers(25.0), SqFt(216.0));
        assert_eq!(cost, Rupees(6480.0));
    }
}
