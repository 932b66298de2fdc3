//! Request DTOs for invoice API endpoints.

use serde::Deserialize;

use crate::models::InvoiceDetails;

use super::models::InvoiceInput;

/// Request to generate, stage and store an invoice.
///
/// Accepts the flat form object: pricing fields and descriptive fields side
/// by side, as the form submits them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    #[serde(flatten)]
    pub input: InvoiceInput,
    #[serde(flatten)]
    pub details: InvoiceDetails,
    /// Caller-chosen invoice number; generated when absent
    #[serde(default)]
    pub invoice_number: Option<String>,
}
