//! Printable invoice document.
//!
//! Presentation only: every amount shown comes straight from the record's
//! breakdown, already rounded. Nothing here recalculates.

use askama::Template;

use crate::models::InvoiceRecord;
use crate::pricing::coercion::{count_or, decimal_or};

const DEFAULT_VISA_TEXT: &str = "KSA Umrah visa included";
const DEFAULT_TRANSPORT_TEXT: &str = "6 Sector Sharing Transport By BUS";
const DEFAULT_PACKAGE_TYPE: &str = "Package";

/// Invoice document template
#[derive(Template)]
#[template(path = "invoice.html")]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub invoice_date: String,
    pub pax: i64,
    pub client_name: String,
    pub package_lines: Vec<String>,
    pub total_pkr: String,
    pub per_pax_pkr: String,
    pub airline_line: Option<String>,
    pub visa_line: Option<String>,
    pub generated_at: String,
}

impl InvoiceDocument {
    pub fn from_record(record: &InvoiceRecord) -> Self {
        let details = &record.details;
        let breakdown = &record.breakdown;
        let pax = breakdown.pax_count;

        let nights_in_makkah = count_or(record.input.nights_in_makkah.as_ref(), 0);
        let nights_in_madinah = count_or(record.input.nights_in_madinah.as_ref(), 0);
        let total_days = nights_in_makkah + nights_in_madinah + 1;

        let package_type = non_empty_or(&details.package_type, DEFAULT_PACKAGE_TYPE);
        let mut package_lines = vec![
            format!("{total_days} Day Umrah Package for {pax} Pax with {package_type}"),
            format!("Makkah Hotel: {}", details.makkah_hotel_name),
            format!("Madinah Hotel: {}", details.madinah_hotel_name),
            format!("{nights_in_makkah} Nights in Makkah & {nights_in_madinah} Nights in Madinah"),
            non_empty_or(&details.visa, DEFAULT_VISA_TEXT).to_string(),
            non_empty_or(&details.transport, DEFAULT_TRANSPORT_TEXT).to_string(),
        ];
        if details.historical_visit {
            package_lines.push("Historical visit of both holy cities".to_string());
        }
        package_lines.push("This Package is valid for the next 24 Hours".to_string());

        let airline_line = (!details.airline_name.is_empty() && breakdown.airline_per_pax_pkr > 0.0)
            .then(|| {
                format!(
                    "Includes Airline ({}) PKR {:.2} / pax",
                    details.airline_name, breakdown.airline_per_pax_pkr
                )
            });

        let visa_per_pax = decimal_or(record.input.visa_rate.as_ref(), 0.0);
        let visa_line = (visa_per_pax != 0.0)
            .then(|| format!("Visa Included (SAR {visa_per_pax:.2} per pax)"));

        let invoice_date = if details.invoice_date.is_empty() {
            record.generated_at.format("%Y-%m-%d").to_string()
        } else {
            details.invoice_date.clone()
        };

        Self {
            invoice_number: record.invoice_number.clone(),
            invoice_date,
            pax,
            client_name: details.client_name.clone(),
            package_lines,
            total_pkr: format!("{:.2}", breakdown.total_with_profit_pkr),
            per_pax_pkr: format!("{:.2}", breakdown.per_pax_pkr),
            airline_line,
            visa_line,
            generated_at: record.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
