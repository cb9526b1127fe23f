//! Distance providers.
//!
//! A provider turns an origin/destination pair into a travel distance.
//! Road routing can fail; the aerial provider cannot.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::distance::geo::{haversine_km, GeoPoint};
use crate::errors::{CalcResult, QuoteError};
use crate::settings::RoutingSettings;
use crate::units::{Kilometers, Meters};

/// Source of a delivery distance
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    /// Short provider name for logs and errors
    fn name(&self) -> &'static str;

    /// Distance from `origin` to `destination`
    async fn distance(&self, origin: GeoPoint, destination: GeoPoint) -> CalcResult<Kilometers>;
}

/// Straight-line (great-circle) distance. Deterministic, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct AerialDistanceProvider;

#[async_trait]
impl DistanceProvider for AerialDistanceProvider {
    fn name(&self) -> &'static str {
        "aerial"
    }

    async fn distance(&self, origin: GeoPoint, destination: GeoPoint) -> CalcResult<Kilometers> {
        Ok(haversine_km(origin, destination))
    }
}

/// Driving distance from an OSRM routing service.
pub struct OsrmRouteProvider {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    /// Meters
    distance: f64,
}

impl OsrmRouteProvider {
    pub fn new(settings: &RoutingSettings) -> CalcResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("wallquote/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout())
            .build()
            .map_err(|e| QuoteError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(OsrmRouteProvider {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// OSRM takes `lng,lat` pairs
    fn route_url(&self, origin: GeoPoint, destination: GeoPoint) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=false&alternatives=false",
            self.base_url, origin.lng, origin.lat, destination.lng, destination.lat
        )
    }
}

/// Pull the shortest route's length out of an OSRM reply
fn road_distance(response: OsrmResponse) -> CalcResult<Kilometers> {
    if response.code != "Ok" {
        let reason = match response.message {
            Some(message) => format!("{}: {}", response.code, message),
            None => response.code,
        };
        return Err(QuoteError::lookup_failed("osrm", reason));
    }
    let route = response
        .routes
        .first()
        .ok_or_else(|| QuoteError::lookup_failed("osrm", "No route returned"))?;
    if !route.distance.is_finite() || route.distance < 0.0 {
        return Err(QuoteError::lookup_failed(
            "osrm",
            format!("Invalid route distance {}", route.distance),
        ));
    }
    Ok(Meters(route.distance).into())
}

#[async_trait]
impl DistanceProvider for OsrmRouteProvider {
    fn name(&self) -> &'static str {
        "osrm"
    }

    async fn distance(&self, origin: GeoPoint, destination: GeoPoint) -> CalcResult<Kilometers> {
        let url = self.route_url(origin, destination);
        tracing::debug!(%url, "Requesting road route");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::lookup_failed(self.name(), format!("Network error: {}", e)))?;

        // OSRM answers 400 with a JSON body for "NoRoute" etc.; let the body explain
        let status = response.status();
        let body: OsrmResponse = response.json().await.map_err(|e| {
            QuoteError::lookup_failed(self.name(), format!("HTTP {}: invalid response: {}", status, e))
        })?;

        road_distance(body)
    }
}
