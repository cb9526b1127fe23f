//! # Quote Controller
//!
//! Drives a [`QuoteSession`] from user events:
//!
//! - form edits are applied at once and a quote recomputation is scheduled
//!   on a trailing-edge debounce (300 ms by default);
//! - a picked location opens a new lookup generation and schedules a distance
//!   lookup on its own debounce (500 ms by default). When a lookup result is
//!   applied the quote is recomputed immediately.
//!
//! Results are pushed to a [`DisplaySink`]. Before exporting, callers can
//! wait for the picked location's distance with
//! [`QuoteController::settle_location`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;

use crate::debounce::Debouncer;
use crate::display::{format_inr, QuoteDisplay};
use crate::distance::geo::GeoPoint;
use crate::distance::resolver::{DistanceMeasurement, DistanceResolver};
use crate::errors::CalcResult;
use crate::session::{FormEvent, LookupTicket, QuoteSession};
use crate::settings::QuoteSettings;

/// Receives display updates
pub trait DisplaySink: Send + Sync {
    /// The quote panel changed
    fn quote_updated(&self, display: &QuoteDisplay);

    /// A new delivery distance was applied
    fn distance_updated(&self, _measurement: &DistanceMeasurement, _shipping_cost: &str) {}
}

type SharedSession = Arc<Mutex<QuoteSession>>;

fn lock(session: &SharedSession) -> MutexGuard<'_, QuoteSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn refresh(session: &SharedSession, sink: &dyn DisplaySink) {
    let display = lock(session).display();
    sink.quote_updated(&display);
}

/// Event-driven owner of one quote session.
pub struct QuoteController {
    session: SharedSession,
    sink: Arc<dyn DisplaySink>,
    recompute: Debouncer<()>,
    locate: Debouncer<LookupTicket>,
    applied: Arc<Notify>,
    /// Longest a picked location can wait for its distance
    lookup_limit: Duration,
}

impl QuoteController {
    /// Create a controller. Must be called inside a tokio runtime.
    pub fn new(settings: QuoteSettings, resolver: DistanceResolver, sink: Arc<dyn DisplaySink>) -> Self {
        let quote_wait = Duration::from_millis(settings.debounce.quote_ms);
        let distance_wait = Duration::from_millis(settings.debounce.distance_ms);
        let lookup_limit = distance_wait + settings.routing.timeout() + Duration::from_secs(1);
        let applied = Arc::new(Notify::new());
        let session: SharedSession = Arc::new(Mutex::new(QuoteSession::new(settings)));

        let recompute = {
            let session = session.clone();
            let sink = sink.clone();
            Debouncer::spawn(quote_wait, move |()| {
                let session = session.clone();
                let sink = sink.clone();
                async move { refresh(&session, sink.as_ref()) }
            })
        };

        let locate = {
            let session = session.clone();
            let sink = sink.clone();
            let applied = applied.clone();
            Debouncer::spawn(distance_wait, move |ticket: LookupTicket| {
                let session = session.clone();
                let sink = sink.clone();
                let resolver = resolver.clone();
                let applied = applied.clone();
                async move {
                    let measurement = resolver.measure(ticket.point).await;
                    let shipping_cost = {
                        let mut guard = lock(&session);
                        if !guard.apply_lookup(&ticket, measurement) {
                            return;
                        }
                        format_inr(guard.surcharge())
                    };
                    applied.notify_waiters();
                    sink.distance_updated(&measurement, &shipping_cost);
                    refresh(&session, sink.as_ref());
                }
            })
        };

        QuoteController {
            session,
            sink,
            recompute,
            locate,
            applied,
            lookup_limit,
        }
    }

    /// Apply a form edit and schedule a recomputation
    pub fn handle(&self, event: FormEvent) {
        lock(&self.session).apply(event);
        self.schedule_recompute();
    }

    /// Recompute on the debounce (e.g. form submit)
    pub fn schedule_recompute(&self) {
        if !self.recompute.call(()) {
            // Debounce task is gone; update synchronously instead
            refresh(&self.session, self.sink.as_ref());
        }
    }

    /// Pick (or drag to) a delivery location and schedule its distance lookup
    pub fn select_location(&self, point: GeoPoint) -> CalcResult<()> {
        point.validate()?;
        let ticket = lock(&self.session).begin_lookup(point);
        tracing::debug!(generation = ticket.generation, %point, "Location selected");
        self.locate.call(ticket);
        Ok(())
    }

    /// Wait until the picked location's distance has been applied.
    ///
    /// Returns `false` if it is still pending after the debounce plus the
    /// routing timeout.
    pub async fn settle_location(&self) -> bool {
        let deadline = tokio::time::Instant::now() + self.lookup_limit;
        loop {
            let notified = self.applied.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !lock(&self.session).lookup_pending() {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return !lock(&self.session).lookup_pending();
            }
        }
    }

    /// Current quote panel contents
    pub fn snapshot(&self) -> QuoteDisplay {
        lock(&self.session).display()
    }

    /// Read the session state
    pub fn with_session<R>(&self, f: impl FnOnce(&QuoteSession) -> R) -> R {
        f(&lock(&self.session))
    }

    /// Flush pending lookups and recomputations, then hand back the session
    pub async fn shutdown(self) -> QuoteSession {
        self.locate.close().await;
        self.recompute.close().await;
        let session = lock(&self.session).clone();
        session
    }
}
