//! # Quote Settings
//!
//! `QuoteSettings` is the root configuration: rate card, delivery policy,
//! factory location and the external services the calculator talks to.
//! Settings serialize to human-readable JSON (see [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! QuoteSettings
//! ├── version: schema version
//! ├── company: CompanyProfile (letterhead on quotations)
//! ├── price_table: PriceTable (wall type -> Rs./sq.ft)
//! ├── shipping: ShippingPolicy (free radius, Rs./sq.ft/km)
//! ├── reference_point: GeoPoint (factory)
//! ├── routing / geocoding / relay: external service endpoints
//! └── debounce: DebounceSettings (ms)
//! ```
//!
//! ## Environment overrides
//!
//! [`QuoteSettings::apply_env`] reads a `.env` file (if any) and then:
//!
//! - `WALLQUOTE_RELAY_ACCESS_KEY`
//! - `WALLQUOTE_RELAY_URL`
//! - `WALLQUOTE_ROUTING_URL`
//! - `WALLQUOTE_GEOCODING_URL`

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distance::geo::{GeoPoint, FACTORY};
use crate::errors::CalcResult;
use crate::pricing::{PriceTable, ShippingPolicy};

/// Current schema version for settings and quote record files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub company: CompanyProfile,
    pub price_table: PriceTable,
    pub shipping: ShippingPolicy,
    /// Where deliveries start from
    pub reference_point: GeoPoint,
    pub routing: RoutingSettings,
    pub geocoding: GeocodingSettings,
    pub relay: RelaySettings,
    pub debounce: DebounceSettings,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        QuoteSettings {
            version: SCHEMA_VERSION.to_string(),
            company: CompanyProfile::default(),
            price_table: PriceTable::standard(),
            shipping: ShippingPolicy::default(),
            reference_point: FACTORY,
            routing: RoutingSettings::default(),
            geocoding: GeocodingSettings::default(),
            relay: RelaySettings::default(),
            debounce: DebounceSettings::default(),
        }
    }
}

impl QuoteSettings {
    /// Check the rate card, the delivery policy and the factory location
    pub fn validate(&self) -> CalcResult<()> {
        self.price_table.validate()?;
        self.shipping.validate()?;
        self.reference_point.validate()?;
        Ok(())
    }

    /// Apply environment overrides (and load `.env` if present)
    pub fn apply_env(mut self) -> Self {
        dotenvy::dotenv().ok();

        if let Ok(key) = env::var("WALLQUOTE_RELAY_ACCESS_KEY") {
            if !key.trim().is_empty() {
                self.relay.access_key = Some(key.trim().to_string());
            }
        }
        if let Ok(url) = env::var("WALLQUOTE_RELAY_URL") {
            self.relay.endpoint = url;
        }
        if let Ok(url) = env::var("WALLQUOTE_ROUTING_URL") {
            self.routing.base_url = url;
        }
        if let Ok(url) = env::var("WALLQUOTE_GEOCODING_URL") {
            self.geocoding.base_url = url;
        }
        self
    }
}

/// Letterhead details printed on quotations and relayed summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        CompanyProfile {
            name: "The Wall Company India".to_string(),
            address: "Lalmom, Gossainpur, West Bengal - 734014".to_string(),
            phone: "+91 747-8055541".to_string(),
            email: "thewallcompanygroup@gmail.com".to_string(),
        }
    }
}

/// Road routing service (OSRM-compatible)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingSettings {
    pub base_url: String,
    /// Give up on the routing service after this long and use aerial distance
    pub timeout_ms: u64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        RoutingSettings {
            base_url: "https://router.project-osrm.org".to_string(),
            timeout_ms: 8_000,
        }
    }
}

impl RoutingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Place search service (Nominatim-compatible)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingSettings {
    pub base_url: String,
    /// ISO country filter
    pub country_codes: String,
    /// Bounding box `west,north,east,south`
    pub viewbox: String,
    pub limit: u32,
    /// Queries shorter than this are not sent
    pub min_query_len: usize,
    pub timeout_ms: u64,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        GeocodingSettings {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            country_codes: "in".to_string(),
            viewbox: "86.5,27.5,90.5,25.5".to_string(),
            limit: 5,
            min_query_len: 3,
            timeout_ms: 8_000,
        }
    }
}

/// Form relay that emails quote summaries to the office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaySettings {
    pub endpoint: String,
    /// Relay access key; relaying is skipped when unset
    pub access_key: Option<String>,
    pub from_name: String,
    pub reply_to: String,
    pub timeout_ms: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        RelaySettings {
            endpoint: "https://api.web3forms.com/submit".to_string(),
            access_key: None,
            from_name: "The Wall Company India".to_string(),
            reply_to: "thewallcompanygroup@gmail.com".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Trailing-edge debounce windows (ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceSettings {
    /// Quote recomputation after form input
    pub quote_ms: u64,
    /// Distance lookup after a location is picked or dragged
    pub distance_ms: u64,
    /// Place search while typing
    pub search_ms: u64,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        DebounceSettings {
            quote_ms: 300,
            distance_ms: 500,
            search_ms: 500,
        }
    }
}
