//! Road distance with an aerial fallback.
//!
//! The resolver asks its primary provider (normally road routing) once,
//! bounded by a timeout. If that fails or times out it logs a warning and
//! answers with the great-circle distance instead. It never retries and
//! never fails.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distance::geo::{haversine_km, GeoPoint};
use crate::distance::provider::{DistanceProvider, OsrmRouteProvider};
use crate::errors::{CalcResult, QuoteError};
use crate::settings::RoutingSettings;

/// How a distance was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMethod {
    /// Driving distance from the routing service
    Road,
    /// Great-circle approximation
    Aerial,
}

impl DistanceMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            DistanceMethod::Road => "road",
            DistanceMethod::Aerial => "aerial",
        }
    }
}

/// A resolved delivery distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceMeasurement {
    pub destination: GeoPoint,
    pub km: f64,
    pub method: DistanceMethod,
}

/// Primary-then-fallback distance strategy.
#[derive(Clone)]
pub struct DistanceResolver {
    origin: GeoPoint,
    primary: Option<Arc<dyn DistanceProvider>>,
    timeout: Duration,
}

impl DistanceResolver {
    /// Resolver with an explicit primary provider
    pub fn new(origin: GeoPoint, primary: Arc<dyn DistanceProvider>, timeout: Duration) -> Self {
        DistanceResolver {
            origin,
            primary: Some(primary),
            timeout,
        }
    }

    /// Road routing via OSRM, aerial fallback
    pub fn osrm(origin: GeoPoint, routing: &RoutingSettings) -> CalcResult<Self> {
        let provider = OsrmRouteProvider::new(routing)?;
        Ok(DistanceResolver::new(origin, Arc::new(provider), routing.timeout()))
    }

    /// Aerial distance only, no network
    pub fn offline(origin: GeoPoint) -> Self {
        DistanceResolver {
            origin,
            primary: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Distance from the origin to `destination`.
    pub async fn measure(&self, destination: GeoPoint) -> DistanceMeasurement {
        if let Some(primary) = &self.primary {
            match self.try_primary(primary.as_ref(), destination).await {
                Ok(km) => {
                    tracing::debug!(provider = primary.name(), km, "Road distance resolved");
                    return DistanceMeasurement {
                        destination,
                        km,
                        method: DistanceMethod::Road,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        provider = primary.name(),
                        code = e.error_code(),
                        "Routing lookup failed, falling back to aerial distance: {}",
                        e
                    );
                }
            }
        }

        DistanceMeasurement {
            destination,
            km: haversine_km(self.origin, destination).value(),
            method: DistanceMethod::Aerial,
        }
    }

    async fn try_primary(&self, primary: &dyn DistanceProvider, destination: GeoPoint) -> CalcResult<f64> {
        let lookup = primary.distance(self.origin, destination);
        let km = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| QuoteError::LookupTimedOut {
                provider: primary.name().to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })??;
        if !km.0.is_finite() || km.0 < 0.0 {
            return Err(QuoteError::lookup_failed(
                primary.name(),
                format!("Invalid distance {}", km.0),
            ));
        }
        Ok(km.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::geo::FACTORY;
    use crate::units::Kilometers;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that answers a fixed distance after an optional delay
    struct FixedRoute {
        km: f64,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FixedRoute {
        fn new(km: f64, delay: Duration) -> Arc<Self> {
            Arc::new(FixedRoute {
                km,
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DistanceProvider for FixedRoute {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn distance(&self, _origin: GeoPoint, _destination: GeoPoint) -> CalcResult<Kilometers> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(Kilometers(self.km))
        }
    }

    struct BrokenRoute {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DistanceProvider for BrokenRoute {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn distance(&self, _origin: GeoPoint, _destination: GeoPoint) -> CalcResult<Kilometers> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(QuoteError::lookup_failed("broken", "502 Bad Gateway"))
        }
    }

    fn destination() -> GeoPoint {
        GeoPoint::new(26.9, 88.5)
    }

    #[tokio::test]
    async fn test_prefers_road_distance() {
        let route = FixedRoute::new(31.5, Duration::ZERO);
        let resolver = DistanceResolver::new(FACTORY, route.clone(), Duration::from_secs(5));

        let m = resolver.measure(destination()).await;
        assert_eq!(m.km, 31.5);
        assert_eq!(m.method, DistanceMethod::Road);
        assert_eq!(m.destination, destination());
        assert_eq!(route.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_falls_back_once_on_failure() {
        let route = Arc::new(BrokenRoute {
            calls: AtomicUsize::new(0),
        });
        let resolver = DistanceResolver::new(FACTORY, route.clone(), Duration::from_secs(5));

        let m = resolver.measure(destination()).await;
        assert_eq!(m.method, DistanceMethod::Aerial);
        assert_eq!(m.km, haversine_km(FACTORY, destination()).0);
        assert_eq!(route.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_on_timeout() {
        let route = FixedRoute::new(31.5, Duration::from_secs(60));
        let resolver = DistanceResolver::new(FACTORY, route, Duration::from_secs(2));

        let m = resolver.measure(destination()).await;
        assert_eq!(m.method, DistanceMethod::Aerial);
    }

    #[tokio::test]
    async fn test_rejects_nonsense_distance() {
        let route = FixedRoute::new(f64::NAN, Duration::ZERO);
        let resolver = DistanceResolver::new(FACTORY, route, Duration::from_secs(1));
        assert_eq!(resolver.measure(destination()).await.method, DistanceMethod::Aerial);
    }

    #[tokio::test]
    async fn test_offline_is_aerial() {
        let resolver = DistanceResolver::offline(FACTORY);
        let m = resolver.measure(FACTORY).await;
        assert_eq!(m.km, 0.0);
        assert_eq!(m.method, DistanceMethod::Aerial);
    }
}
