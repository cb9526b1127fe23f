//! # Quote Export
//!
//! Turns the current session into a customer-facing quotation:
//!
//! 1. [`QuoteRecord::from_session`] checks that a location was picked and the
//!    form is complete, and snapshots the quote
//! 2. [`render_quote_pdf`] renders the quotation and it is written to the
//!    output directory
//! 3. the request is forwarded through a [`QuoteRelay`]
//!
//! The relay is best effort. Its failure is logged and reported in
//! [`ExportOutcome::relay`], but the export itself still succeeds.

pub mod record;
pub mod relay;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, QuoteError};
use crate::file_io::write_atomic;
use crate::pdf::render_quote_pdf;
use crate::session::QuoteSession;
use crate::settings::CompanyProfile;

pub use record::{CustomerInfo, QuoteRecord};
pub use relay::{compose_message, subject_line, QuoteRelay, Web3FormsRelay};

/// What happened to the relay step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum RelayStatus {
    Delivered,
    Failed(String),
    /// No relay configured
    Skipped,
}

/// Result of a successful export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub record: QuoteRecord,
    pub pdf_path: PathBuf,
    pub relay: RelayStatus,
}

/// Export the session's quote for `customer` into `out_dir`.
///
/// # Errors
///
/// - `LocationRequired` / `MissingField` / `InvalidSelection` when the
///   session is not ready for export
/// - `RenderFailed` / `FileError` when the PDF cannot be produced
pub async fn export_quote(
    session: &QuoteSession,
    customer: CustomerInfo,
    out_dir: &Path,
    relay: Option<&dyn QuoteRelay>,
) -> CalcResult<ExportOutcome> {
    let record = QuoteRecord::from_session(session, customer)?;
    export_record(record, &session.settings().company, out_dir, relay).await
}

/// Render, write and relay an already-built record.
pub async fn export_record(
    record: QuoteRecord,
    company: &CompanyProfile,
    out_dir: &Path,
    relay: Option<&dyn QuoteRelay>,
) -> CalcResult<ExportOutcome> {
    let pdf = render_quote_pdf(&record, company)?;

    fs::create_dir_all(out_dir).map_err(|e| {
        QuoteError::file_error("create directory", out_dir.display().to_string(), e.to_string())
    })?;
    let pdf_path = out_dir.join(record.pdf_file_name());
    write_atomic(&pdf_path, &pdf)?;
    tracing::info!(reference = %record.reference, path = %pdf_path.display(), "Quotation written");

    let relay = match relay {
        Some(relay) => match relay.send(&record).await {
            Ok(()) => RelayStatus::Delivered,
            Err(e) => {
                tracing::error!(
                    relay = relay.name(),
                    reference = %record.reference,
                    "Failed to relay quote request: {}",
                    e
                );
                RelayStatus::Failed(e.to_string())
            }
        },
        None => {
            tracing::debug!("No relay configured, skipping");
            RelayStatus::Skipped
        }
    };

    Ok(ExportOutcome {
        record,
        pdf_path,
        relay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::distance::geo::GeoPoint;
    use crate::distance::resolver::{DistanceMeasurement, DistanceMethod};
    use crate::session::FormEvent;
    use crate::settings::QuoteSettings;

    #[derive(Default)]
    struct RecordingRelay {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl QuoteRelay for RecordingRelay {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, record: &QuoteRecord) -> CalcResult<()> {
            self.sent.lock().unwrap().push(compose_message(record));
            Ok(())
        }
    }

    struct DownRelay;

    #[async_trait]
    impl QuoteRelay for DownRelay {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn send(&self, _record: &QuoteRecord) -> CalcResult<()> {
            Err(QuoteError::RelayFailed {
                reason: "503 Service Unavailable".to_string(),
            })
        }
    }

    fn out_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wallquote_export_{}_{}", name, std::process::id()))
    }

    fn ready_session() -> QuoteSession {
        let mut session = QuoteSession::new(QuoteSettings::default());
        session.apply(FormEvent::WallType(Some("boundary".into())));
        session.apply(FormEvent::Length(Some(10.0)));
        session.apply(FormEvent::Breadth(Some(8.0)));
        session.apply(FormEvent::Height(Some(6.0)));
        session.set_measured_distance(DistanceMeasurement {
            destination: GeoPoint::new(26.9, 88.5),
            km: 25.0,
            method: DistanceMethod::Road,
        });
        session
    }

    #[tokio::test]
    async fn test_export_writes_pdf_and_relays() {
        let dir = out_dir("relayed");
        let relay = RecordingRelay::default();
        let customer = CustomerInfo::new("Asha Roy", "98300 12345").unwrap();

        let outcome = export_quote(&ready_session(), customer, &dir, Some(&relay))
            .await
            .unwrap();

        assert_eq!(outcome.relay, RelayStatus::Delivered);
        assert_eq!(outcome.record.result.total, 28_080.0);
        let bytes = fs::read(&outcome.pdf_path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let sent = relay.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("- Total Amount: Rs.28,080"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_relay_failure_does_not_fail_export() {
        let dir = out_dir("relay_down");
        let customer = CustomerInfo::new("Asha Roy", "98300 12345").unwrap();

        let outcome = export_quote(&ready_session(), customer, &dir, Some(&DownRelay))
            .await
            .unwrap();

        assert!(matches!(outcome.relay, RelayStatus::Failed(ref reason) if reason.contains("503")));
        assert!(outcome.pdf_path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_export_without_location_writes_nothing() {
        let dir = out_dir("no_location");
        let mut session = QuoteSession::new(QuoteSettings::default());
        session.apply(FormEvent::WallType(Some("boundary".into())));
        session.apply(FormEvent::Length(Some(10.0)));
        session.apply(FormEvent::Breadth(Some(8.0)));
        session.apply(FormEvent::Height(Some(6.0)));
        let customer = CustomerInfo::new("Asha Roy", "98300 12345").unwrap();

        let err = export_quote(&session, customer, &dir, None).await.unwrap_err();

        assert_eq!(err, QuoteError::LocationRequired);
        assert!(!dir.exists());
    }

    #[test]
    fn test_relay_status_json() {
        let json = serde_json::to_string(&RelayStatus::Failed("timeout".into())).unwrap();
        assert_eq!(json, r#"{"status":"failed","detail":"timeout"}"#);
        let json = serde_json::to_string(&RelayStatus::Skipped).unwrap();
        assert_eq!(json, r#"{"status":"skipped"}"#);
    }
}
