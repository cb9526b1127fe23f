//! Saved quotations.
//!
//! A [`QuoteRecord`] is the snapshot taken at export time: who asked, what
//! was priced, where it is going and how the distance was measured. It is
//! what the PDF, the relay message and the saved `.json` record are built
//! from.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{QuoteInput, QuoteResult};
use crate::distance::geo::GeoPoint;
use crate::distance::resolver::DistanceMethod;
use crate::errors::{CalcResult, QuoteError};
use crate::session::QuoteSession;
use crate::settings::SCHEMA_VERSION;

/// Contact details of the customer requesting the quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
}

impl CustomerInfo {
    /// Trimmed contact details; both fields are required.
    pub fn new(name: impl AsRef<str>, phone: impl AsRef<str>) -> CalcResult<Self> {
        let name = name.as_ref().trim();
        let phone = phone.as_ref().trim();
        if name.is_empty() {
            return Err(QuoteError::missing_field("customer_name"));
        }
        if phone.is_empty() {
            return Err(QuoteError::missing_field("customer_phone"));
        }
        Ok(CustomerInfo {
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }
}

/// A priced quotation ready to be rendered, relayed and archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub id: Uuid,
    /// Short human-facing reference, e.g. `Q-1A2B3C4D`
    pub reference: String,
    pub created: DateTime<Utc>,
    pub customer: CustomerInfo,
    pub input: QuoteInput,
    pub result: QuoteResult,
    /// Delivery location
    pub location: GeoPoint,
    /// How the delivery distance was obtained
    pub distance_method: DistanceMethod,
}

impl QuoteRecord {
    /// Snapshot the session for export.
    ///
    /// # Errors
    ///
    /// - `LocationRequired` if no delivery location was picked
    /// - `DistancePending` if the picked location's distance is not applied yet
    /// - `MissingField` / `InvalidSelection` / `InvalidInput` if the form is
    ///   incomplete or invalid
    pub fn from_session(session: &QuoteSession, customer: CustomerInfo) -> CalcResult<Self> {
        let result = session.exportable_quote()?;
        let location = session.location().ok_or(QuoteError::LocationRequired)?;
        let input = session.form().to_input(session.distance_km())?;
        let distance_method = session
            .distance()
            .map(|m| m.method)
            .ok_or(QuoteError::DistancePending)?;
        Ok(QuoteRecord::new(customer, input, result, location, distance_method))
    }

    pub fn new(
        customer: CustomerInfo,
        input: QuoteInput,
        result: QuoteResult,
        location: GeoPoint,
        distance_method: DistanceMethod,
    ) -> Self {
        let id = Uuid::new_v4();
        QuoteRecord {
            version: SCHEMA_VERSION.to_string(),
            id,
            reference: reference_for(&id),
            created: Utc::now(),
            customer,
            input,
            result,
            location,
            distance_method,
        }
    }

    /// Issue date as shown on the quotation (`dd/mm/yyyy`, local time)
    pub fn issue_date(&self) -> String {
        self.created.with_timezone(&Local).format("%d/%m/%Y").to_string()
    }

    /// `Quote_<wallType>_<dd-mm-yyyy>.pdf`
    pub fn pdf_file_name(&self) -> String {
        format!(
            "Quote_{}_{}.pdf",
            self.result.wall_type.key(),
            self.created.with_timezone(&Local).format("%d-%m-%Y")
        )
    }
}

fn reference_for(id: &Uuid) -> String {
    let simple = id.simple().to_string().to_uppercase();
    format!("Q-{}", &simple[..8])
}
