//! Response DTOs for invoice API endpoints.

use serde::Serialize;

use crate::models::{InvoiceRecord, RecordId};

use super::models::InvoiceBreakdown;

/// Calculation preview with display strings alongside the raw amounts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    #[serde(flatten)]
    pub breakdown: InvoiceBreakdown,
    pub display: BreakdownDisplay,
}

/// Preformatted amounts, e.g. `"70,212.50 PKR"`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownDisplay {
    /// Rates as entered, blank counted as zero
    pub makkah_hotel_rate: String,
    pub madinah_hotel_rate: String,
    pub visa_rate: String,
    pub ziyarat_rate: String,
    pub airline_price_pkr: String,
    pub makkah_cost: String,
    pub madinah_cost: String,
    pub visa_total: String,
    pub ziyarat_total: String,
    pub base_total: String,
    pub with_profit: String,
    pub per_pax_sar: String,
    pub per_pax_pkr: String,
    pub airline_total_pkr: String,
    #[serde(rename = "totalWithProfitPKR")]
    pub total_with_profit_pkr: String,
}

/// Outcome of the record store write, reported but never fatal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StoreOutcome {
    Saved { id: RecordId },
    Failed { message: String },
}

/// Response for invoice generation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceResponse {
    pub record: InvoiceRecord,
    pub staged_count: usize,
    pub store: StoreOutcome,
    pub message: String,
}

/// Response for staging list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingListResponse {
    pub count: usize,
    pub invoices: Vec<InvoiceRecord>,
}

/// Response after removing or clearing staged invoices
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingCountResponse {
    pub staged_count: usize,
}

/// Response for committing the staging buffer to the sheet
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub committed: usize,
    pub file_name: String,
    pub rows: usize,
    pub message: String,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}
