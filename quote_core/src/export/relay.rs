//! Forwarding quote requests to the business.
//!
//! After a quotation is exported, a plain-text summary is posted to a form
//! relay so the company can follow up with the customer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::display::{format_inr, format_km, format_rate};
use crate::errors::{CalcResult, QuoteError};
use crate::export::record::QuoteRecord;
use crate::settings::RelaySettings;

/// Delivers a quote summary somewhere a human will read it
#[async_trait]
pub trait QuoteRelay: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, record: &QuoteRecord) -> CalcResult<()>;
}

/// Web3Forms JSON submission
pub struct Web3FormsRelay {
    http: Client,
    endpoint: String,
    access_key: String,
    from_name: String,
    reply_to: String,
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    access_key: &'a str,
    subject: String,
    message: String,
    from_name: &'a str,
    reply_to: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

impl Web3FormsRelay {
    /// Build from settings. Returns `Ok(None)` when no access key is configured.
    pub fn from_settings(settings: &RelaySettings) -> CalcResult<Option<Self>> {
        let access_key = match settings.access_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Ok(None),
        };
        let http = Client::builder()
            .user_agent(concat!("wallquote/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| QuoteError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Some(Web3FormsRelay {
            http,
            endpoint: settings.endpoint.clone(),
            access_key,
            from_name: settings.from_name.clone(),
            reply_to: settings.reply_to.clone(),
        }))
    }
}

#[async_trait]
impl QuoteRelay for Web3FormsRelay {
    fn name(&self) -> &'static str {
        "web3forms"
    }

    async fn send(&self, record: &QuoteRecord) -> CalcResult<()> {
        let body = Submission {
            access_key: &self.access_key,
            subject: subject_line(record),
            message: compose_message(record),
            from_name: &self.from_name,
            reply_to: &self.reply_to,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| QuoteError::RelayFailed {
                reason: format!("Network error: {}", e),
            })?;

        let status = response.status();
        let reply: SubmissionResponse = response.json().await.map_err(|e| QuoteError::RelayFailed {
            reason: format!("Unexpected response ({}): {}", status, e),
        })?;

        if !status.is_success() || !reply.success {
            return Err(QuoteError::RelayFailed {
                reason: reply
                    .message
                    .unwrap_or_else(|| format!("Relay returned {}", status)),
            });
        }

        tracing::info!(reference = %record.reference, "Quote request relayed");
        Ok(())
    }
}

/// `New Quote Request - <customer name>`
pub fn subject_line(record: &QuoteRecord) -> String {
    format!("New Quote Request - {}", record.customer.name)
}

/// Plain-text summary of a quotation for the business inbox.
pub fn compose_message(record: &QuoteRecord) -> String {
    let r = &record.result;
    let lines = [
        "NEW QUOTE REQUEST".to_string(),
        String::new(),
        "Customer Information:".to_string(),
        format!("- Name: {}", record.customer.name),
        format!("- Phone: {}", record.customer.phone),
        String::new(),
        "Quote Details:".to_string(),
        format!("- Reference: {}", record.reference),
        format!("- Wall Type: {}", r.wall_type.display_name()),
        format!("- Perimeter: {:.2} feet", r.perimeter_ft),
        format!("- Height: {} feet", r.height_ft),
        format!("- Area: {:.2} sq.ft", r.area_sqft),
        format!("- Base Rate: {}/sq.ft", format_rate(r.base_rate)),
        String::new(),
        "Cost Breakdown:".to_string(),
        format!("- Base Cost: {}", format_inr(r.base_cost)),
        format!(
            "- Distance: {} km ({})",
            format_km(r.distance_km),
            record.distance_method.display_name()
        ),
        format!(
            "- Shipping Distance: {} km (free up to {} km)",
            format_km(r.billable_distance_km),
            r.free_radius_km
        ),
        format!("- Shipping Cost: {}", format_inr(r.surcharge)),
        format!("- Total Amount: {}", format_inr(r.total)),
        String::new(),
        format!("Delivery Location: {}", record.location),
        format!("Date: {}", record.issue_date()),
        String::new(),
        "Note: This quote was generated automatically. Please contact the customer for further details."
            .to_string(),
    ];
    lines.join("\n")
}
