//! # Quote Session
//!
//! All mutable state of one quote form lives here: the form values, the
//! picked delivery location, the last applied distance and the lookup
//! generation counter. Calculation functions take this state by reference.
//!
//! ## Lookup ordering
//!
//! Every location pick starts a new lookup generation. A lookup result is
//! applied only if it carries the latest generation, so a slow response for
//! an old pick can never overwrite the distance of a newer one.
//!
//! ```rust
//! use quote_core::distance::{DistanceMeasurement, DistanceMethod, GeoPoint};
//! use quote_core::session::QuoteSession;
//! use quote_core::settings::QuoteSettings;
//!
//! let mut session = QuoteSession::new(QuoteSettings::default());
//! let first = session.begin_lookup(GeoPoint::new(26.9, 88.5));
//! let second = session.begin_lookup(GeoPoint::new(27.0, 88.6));
//!
//! let stale = DistanceMeasurement { destination: first.point, km: 30.0, method: DistanceMethod::Road };
//! assert!(!session.apply_lookup(&first, stale));
//!
//! let fresh = DistanceMeasurement { destination: second.point, km: 42.0, method: DistanceMethod::Road };
//! assert!(session.apply_lookup(&second, fresh));
//! assert_eq!(session.distance_km(), 42.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{calculate, evaluate, QuoteForm, QuoteResult};
use crate::display::QuoteDisplay;
use crate::distance::geo::GeoPoint;
use crate::distance::resolver::DistanceMeasurement;
use crate::errors::{CalcResult, QuoteError};
use crate::pricing::WallType;
use crate::settings::QuoteSettings;

/// One edit on the quote form. `None` clears the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FormEvent {
    WallType(Option<String>),
    Length(Option<f64>),
    Breadth(Option<f64>),
    Height(Option<f64>),
}

/// Handle for an in-flight distance lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupTicket {
    pub generation: u64,
    pub point: GeoPoint,
}

/// Mutable state of one quote form.
#[derive(Debug, Clone)]
pub struct QuoteSession {
    settings: QuoteSettings,
    form: QuoteForm,
    location: Option<GeoPoint>,
    distance: Option<DistanceMeasurement>,
    generation: u64,
}

impl QuoteSession {
    pub fn new(settings: QuoteSettings) -> Self {
        QuoteSession {
            settings,
            form: QuoteForm::default(),
            location: None,
            distance: None,
            generation: 0,
        }
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    pub fn form(&self) -> &QuoteForm {
        &self.form
    }

    /// Apply one form edit
    pub fn apply(&mut self, event: FormEvent) {
        match event {
            FormEvent::WallType(value) => self.form.wall_type = value,
            FormEvent::Length(value) => self.form.length_ft = value,
            FormEvent::Breadth(value) => self.form.breadth_ft = value,
            FormEvent::Height(value) => self.form.height_ft = value,
        }
    }

    /// Select a wall type directly
    pub fn set_wall_type(&mut self, wall_type: WallType) {
        self.form.wall_type = Some(wall_type.key().to_string());
    }

    /// Picked delivery location, if any
    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Last applied distance measurement, if any
    pub fn distance(&self) -> Option<&DistanceMeasurement> {
        self.distance.as_ref()
    }

    /// Distance used for pricing; 0 until a lookup has been applied
    pub fn distance_km(&self) -> f64 {
        self.distance.map(|m| m.km).unwrap_or(0.0)
    }

    /// Record a newly picked location and open a lookup generation for it.
    pub fn begin_lookup(&mut self, point: GeoPoint) -> LookupTicket {
        self.generation += 1;
        self.location = Some(point);
        LookupTicket {
            generation: self.generation,
            point,
        }
    }

    /// Apply a finished lookup. Returns `false` (and changes nothing) when a
    /// newer lookup has been started since the ticket was issued.
    pub fn apply_lookup(&mut self, ticket: &LookupTicket, measurement: DistanceMeasurement) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale distance lookup"
            );
            return false;
        }
        self.distance = Some(measurement);
        true
    }

    /// Apply a distance that was measured outside the session (e.g. given on
    /// the command line). Starts and completes a generation in one step.
    pub fn set_measured_distance(&mut self, measurement: DistanceMeasurement) {
        let ticket = self.begin_lookup(measurement.destination);
        self.apply_lookup(&ticket, measurement);
    }

    /// Price the current form, if it is complete and valid
    pub fn current_quote(&self) -> Option<QuoteResult> {
        evaluate(
            &self.form,
            self.distance_km(),
            &self.settings.price_table,
            &self.settings.shipping,
        )
    }

    /// What the quote panel should show right now
    pub fn display(&self) -> QuoteDisplay {
        QuoteDisplay::from_outcome(self.current_quote().as_ref())
    }

    /// Surcharge for the current area and distance, shown next to the map
    pub fn surcharge(&self) -> f64 {
        match self.form.area_sqft() {
            Some(area) => self.settings.shipping.surcharge(self.distance_km(), area),
            None => 0.0,
        }
    }

    /// Whether the picked location still waits for its distance
    pub fn lookup_pending(&self) -> bool {
        match (self.location, self.distance) {
            (Some(point), Some(measured)) => measured.destination != point,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// A quote ready for export: location picked, its distance applied and
    /// the form complete.
    pub fn exportable_quote(&self) -> CalcResult<QuoteResult> {
        if self.location.is_none() {
            return Err(QuoteError::LocationRequired);
        }
        if self.lookup_pending() {
            return Err(QuoteError::DistancePending);
        }
        let input = self.form.to_input(self.distance_km())?;
        calculate(&input, &self.settings.price_table, &self.settings.shipping)
    }
}
