//! # Location Search
//!
//! Free-text place search used to pick a delivery location without clicking
//! on a map. Results are restricted to the delivery region configured in
//! [`GeocodingSettings`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::distance::geo::GeoPoint;
use crate::errors::{CalcResult, QuoteError};
use crate::settings::GeocodingSettings;

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMatch {
    /// Short name (first two parts of the full address)
    pub title: String,
    /// "City, State" when available, else the full address
    pub description: String,
    /// Place kind reported by the service ("village", "road", ...)
    pub kind: String,
    pub point: GeoPoint,
}

/// Place search backend
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &str) -> CalcResult<Vec<PlaceMatch>>;
}

/// Nominatim (OpenStreetMap) place search
pub struct NominatimSearch {
    http: Client,
    settings: GeocodingSettings,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

impl NominatimSearch {
    pub fn new(settings: &GeocodingSettings) -> CalcResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("wallquote/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| QuoteError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(NominatimSearch {
            http,
            settings: settings.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.settings.base_url.trim_end_matches('/'))
    }
}

impl NominatimPlace {
    fn into_match(self) -> Option<PlaceMatch> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lng = self.lon.trim().parse::<f64>().ok()?;
        let point = GeoPoint::new(lat, lng);
        point.validate().ok()?;

        let title = self
            .display_name
            .split(',')
            .take(2)
            .collect::<Vec<_>>()
            .join(",");

        let description = self
            .address
            .as_ref()
            .map(|address| {
                let locality = address
                    .city
                    .as_deref()
                    .or(address.town.as_deref())
                    .or(address.village.as_deref())
                    .unwrap_or("");
                let state = address.state.as_deref().unwrap_or("");
                format!("{}, {}", locality, state)
                    .trim_matches([',', ' '])
                    .to_string()
            })
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| self.display_name.clone());

        Some(PlaceMatch {
            title,
            description,
            kind: self.kind.unwrap_or_else(|| "location".to_string()),
            point,
        })
    }
}

#[async_trait]
impl PlaceSearch for NominatimSearch {
    async fn search(&self, query: &str) -> CalcResult<Vec<PlaceMatch>> {
        let query = query.trim();
        if query.chars().count() < self.settings.min_query_len {
            return Ok(Vec::new());
        }

        let limit = self.settings.limit.to_string();
        let params = [
            ("format", "json"),
            ("q", query),
            ("limit", limit.as_str()),
            ("addressdetails", "1"),
            ("countrycodes", self.settings.country_codes.as_str()),
            ("bounded", "1"),
            ("viewbox", self.settings.viewbox.as_str()),
        ];

        let response = self
            .http
            .get(self.search_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| QuoteError::SearchFailed {
                reason: format!("Network error: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(QuoteError::SearchFailed {
                reason: format!("Search service returned {}", response.status()),
            });
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| QuoteError::SearchFailed {
            reason: format!("Failed to parse response: {}", e),
        })?;

        Ok(places.into_iter().filter_map(NominatimPlace::into_match).collect())
    }
}
