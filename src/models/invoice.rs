//! Invoice record models shared by staging, storage and exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{InvoiceBreakdown, InvoiceInput};

/// Descriptive form fields that do not take part in pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDetails {
    pub client_name: String,
    /// `YYYY-MM-DD`; empty means "today" to exporters
    pub invoice_date: String,
    pub from_date: String,
    pub to_date: String,
    pub makkah_hotel_name: String,
    pub madinah_hotel_name: String,
    pub airline_name: String,
    pub package_type: String,
    #[serde(alias = "visaInfo")]
    pub visa: String,
    #[serde(alias = "transportInfo")]
    pub transport: String,
    pub historical_visit: bool,
}

/// A generated invoice: raw inputs, descriptive details and the breakdown
/// computed from those inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub invoice_number: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub input: InvoiceInput,
    #[serde(default)]
    pub details: InvoiceDetails,
    #[serde(default)]
    pub breakdown: InvoiceBreakdown,
}

/// Identifier assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
