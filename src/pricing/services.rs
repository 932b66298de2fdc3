//! Invoice workflow functions.
//!
//! These combine the pure calculator with the injected collaborators:
//! staging buffer, record store and exporters. Collaborator failures never
//! change a computed breakdown.

use askama::Template;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::{AppError, Result};
use crate::export::InvoiceDocument;
use crate::models::InvoiceRecord;
use crate::AppState;

use super::calculators::calculate_invoice;
use super::formatting::{
    format_currency, format_field_currency, format_sar, generate_invoice_number,
};
use super::models::{InvoiceBreakdown, InvoiceInput};
use super::requests::GenerateInvoiceRequest;
use super::responses::{
    BreakdownDisplay, CalculationResponse, CommitResponse, GenerateInvoiceResponse, StoreOutcome,
};

/// Calculate a breakdown for display, without staging or storing anything.
pub fn preview(input: &InvoiceInput) -> CalculationResponse {
    let breakdown = calculate_invoice(input);
    let display = display_amounts(input, &breakdown);
    CalculationResponse { breakdown, display }
}

fn display_amounts(input: &InvoiceInput, b: &InvoiceBreakdown) -> BreakdownDisplay {
    let sar = |v: f64| format_sar(Some(v));
    let pkr = |v: f64| format_currency(Some(v), "PKR");

    BreakdownDisplay {
        makkah_hotel_rate: format_field_currency(input.makkah_hotel_rate.as_ref(), "SAR"),
        madinah_hotel_rate: format_field_currency(input.madinah_hotel_rate.as_ref(), "SAR"),
        visa_rate: format_field_currency(input.visa_rate.as_ref(), "SAR"),
        ziyarat_rate: format_field_currency(input.ziyarat_rate.as_ref(), "SAR"),
        airline_price_pkr: format_field_currency(input.airline_price_pkr.as_ref(), "PKR"),
        makkah_cost: sar(b.makkah_cost),
        madinah_cost: sar(b.madinah_cost),
        visa_total: sar(b.visa_total),
        ziyarat_total: sar(b.ziyarat_total),
        base_total: sar(b.base_total),
        with_profit: sar(b.with_profit),
        per_pax_sar: sar(b.per_pax_sar),
        per_pax_pkr: pkr(b.per_pax_pkr),
        airline_total_pkr: pkr(b.airline_total_pkr),
        total_with_profit_pkr: pkr(b.total_with_profit_pkr),
    }
}

/// Generate an invoice: calculate, number, stage, then try the record store.
///
/// The invoice is staged before the store write, so a store failure leaves
/// it staged and is reported in the response instead of as an error.
pub async fn generate_invoice(
    state: &AppState,
    request: GenerateInvoiceRequest,
) -> Result<GenerateInvoiceResponse> {
    if request.details.client_name.trim().is_empty() {
        return Err(AppError::Validation("Please enter client name".to_string()));
    }

    let invoice_number = request
        .invoice_number
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(generate_invoice_number);

    let record = InvoiceRecord {
        invoice_number,
        generated_at: Utc::now(),
        breakdown: calculate_invoice(&request.input),
        input: request.input,
        details: request.details,
    };

    let staged_count = state.staging.add(record.clone())?;
    info!(
        "Staged invoice {} for {} ({} staged)",
        record.invoice_number, record.details.client_name, staged_count
    );

    let (store, message) = match state.records.save(&record).await {
        Ok(id) => (
            StoreOutcome::Saved { id },
            "Invoice staged and saved to the record store. Commit staging to write the sheet."
                .to_string(),
        ),
        Err(e) => {
            warn!("Record store save failed for {}: {}", record.invoice_number, e);
            (
                StoreOutcome::Failed {
                    message: e.to_string(),
                },
                "Record store save failed. Invoice is still staged locally.".to_string(),
            )
        }
    };

    Ok(GenerateInvoiceResponse {
        record,
        staged_count,
        store,
        message,
    })
}

/// Append every staged invoice to the sheet, then empty the buffer.
///
/// The buffer is only cleared when the whole batch was written. If the
/// rows are written but the buffer cannot be cleared, the commit fails so
/// the caller knows a retry would append the same invoices again.
pub fn commit_staged(state: &AppState) -> Result<CommitResponse> {
    let staged = state.staging.get_all();
    if staged.is_empty() {
        return Err(AppError::Validation("No staged invoices to save".to_string()));
    }

    let rows = state.sheet.append(&staged)?;
    if let Err(e) = state.staging.clear() {
        error!(
            "Appended {} invoices to {} but could not clear staging: {}",
            staged.len(),
            state.sheet.file_name(),
            e
        );
        return Err(AppError::Internal(format!(
            "{} invoices were written to {} but the staging buffer could not be cleared ({}). \
             Clear it before committing again to avoid duplicate rows.",
            staged.len(),
            state.sheet.file_name(),
            e
        )));
    }

    Ok(CommitResponse {
        committed: staged.len(),
        file_name: state.sheet.file_name(),
        rows,
        message: "All staged invoices saved to the sheet".to_string(),
    })
}

/// Render the printable document for a staged invoice.
pub fn render_document(state: &AppState, invoice_number: &str) -> Result<String> {
    let record = state
        .staging
        .get(invoice_number)
        .ok_or(AppError::NotFound)?;

    Ok(InvoiceDocument::from_record(&record).render()?)
}
