//! # Delivery Distance
//!
//! Resolves a picked location into a delivery distance from the factory.
//!
//! - [`geo`] - Coordinates and the haversine formula
//! - [`provider`] - `DistanceProvider` trait, OSRM road routing, aerial distance
//! - [`resolver`] - Road-then-aerial fallback strategy
//!
//! ## Example
//!
//! ```rust
//! use quote_core::distance::{DistanceMethod, DistanceResolver, GeoPoint, FACTORY};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! let resolver = DistanceResolver::offline(FACTORY);
//! let m = rt.block_on(resolver.measure(GeoPoint::new(26.9, 88.5)));
//! assert_eq!(m.method, DistanceMethod::Aerial);
//! ```

pub mod geo;
pub mod provider;
pub mod resolver;

pub use geo::{haversine_km, GeoPoint, EARTH_RADIUS_KM, FACTORY};
pub use provider::{AerialDistanceProvider, DistanceProvider, OsrmRouteProvider};
pub use resolver::{DistanceMeasurement, DistanceMethod, DistanceResolver};
