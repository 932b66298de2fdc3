//! Cumulative invoice sheet.
//!
//! One CSV file collects every committed invoice, one row each, under the
//! column headers used by the original spreadsheet so historical sheets and
//! new rows line up.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::InvoiceRecord;
use crate::pricing::coercion::{count_or, decimal_or};
use crate::pricing::round_money;

/// Default sheet file name
pub const SHEET_FILE_NAME: &str = "hotel_invoices.csv";

/// Column headers, in sheet order
pub const SHEET_HEADERS: [&str; 33] = [
    "Invoice Number",
    "Date",
    "Client Name",
    "From Date",
    "To Date",
    "Package Type",
    "Visa Text",
    "Transport Text",
    "Historical Visit",
    "Pax Count",
    "Makkah Hotel",
    "Makkah Rate (SAR)",
    "Makkah Nights",
    "Makkah Cost (SAR)",
    "Madinah Hotel",
    "Madinah Rate (SAR)",
    "Madinah Nights",
    "Madinah Cost (SAR)",
    "Visa Per Pax (SAR)",
    "Visa Total (SAR)",
    "Ziyarat Per Pax (SAR)",
    "Ziyarat Total (SAR)",
    "Airline Name",
    "Airline Per Pax (PKR)",
    "Airline Total (PKR)",
    "Base Total (SAR)",
    "Profit Percentage",
    "Total With Profit (SAR)",
    "Per Pax Amount (SAR)",
    "Exchange Rate (SAR->PKR)",
    "Per Pax Amount (PKR)",
    "Total With Profit (PKR)",
    "Generated At",
];

/// One sheet row: a flattened projection of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    #[serde(rename = "Invoice Number")]
    pub invoice_number: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Client Name")]
    pub client_name: String,
    #[serde(rename = "From Date")]
    pub from_date: String,
    #[serde(rename = "To Date")]
    pub to_date: String,
    #[serde(rename = "Package Type")]
    pub package_type: String,
    #[serde(rename = "Visa Text")]
    pub visa_text: String,
    #[serde(rename = "Transport Text")]
    pub transport_text: String,
    #[serde(rename = "Historical Visit")]
    pub historical_visit: String,
    #[serde(rename = "Pax Count")]
    pub pax_count: i64,
    #[serde(rename = "Makkah Hotel")]
    pub makkah_hotel: String,
    #[serde(rename = "Makkah Rate (SAR)")]
    pub makkah_rate: f64,
    #[serde(rename = "Makkah Nights")]
    pub makkah_nights: i64,
    #[serde(rename = "Makkah Cost (SAR)")]
    pub makkah_cost: f64,
    #[serde(rename = "Madinah Hotel")]
    pub madinah_hotel: String,
    #[serde(rename = "Madinah Rate (SAR)")]
    pub madinah_rate: f64,
    #[serde(rename = "Madinah Nights")]
    pub madinah_nights: i64,
    #[serde(rename = "Madinah Cost (SAR)")]
    pub madinah_cost: f64,
    #[serde(rename = "Visa Per Pax (SAR)")]
    pub visa_per_pax: f64,
    #[serde(rename = "Visa Total (SAR)")]
    pub visa_total: f64,
    #[serde(rename = "Ziyarat Per Pax (SAR)")]
    pub ziyarat_per_pax: f64,
    #[serde(rename = "Ziyarat Total (SAR)")]
    pub ziyarat_total: f64,
    #[serde(rename = "Airline Name")]
    pub airline_name: String,
    #[serde(rename = "Airline Per Pax (PKR)")]
    pub airline_per_pax_pkr: f64,
    #[serde(rename = "Airline Total (PKR)")]
    pub airline_total_pkr: f64,
    #[serde(rename = "Base Total (SAR)")]
    pub base_total: f64,
    #[serde(rename = "Profit Percentage")]
    pub profit_percentage: f64,
    #[serde(rename = "Total With Profit (SAR)")]
    pub with_profit: f64,
    #[serde(rename = "Per Pax Amount (SAR)")]
    pub per_pax_sar: f64,
    #[serde(rename = "Exchange Rate (SAR->PKR)")]
    pub exchange_rate: f64,
    #[serde(rename = "Per Pax Amount (PKR)")]
    pub per_pax_pkr: f64,
    #[serde(rename = "Total With Profit (PKR)")]
    pub total_with_profit_pkr: f64,
    #[serde(rename = "Generated At")]
    pub generated_at: String,
}

impl SheetRow {
    /// Project a record onto the sheet columns.
    ///
    /// Breakdown amounts are copied as computed. Raw inputs go through the
    /// same coercion as the pricing engine; a missing invoice date falls
    /// back to `today`.
    pub fn from_record(record: &InvoiceRecord, today: NaiveDate) -> Self {
        let input = &record.input;
        let details = &record.details;
        let breakdown = &record.breakdown;

        let pax_count = Some(count_or(input.per_pax_count.as_ref(), 0))
            .filter(|n| *n > 0)
            .or(Some(breakdown.pax_count).filter(|n| *n > 0))
            .unwrap_or(1);

        let exchange_rate = Some(decimal_or(input.exchange_rate.as_ref(), 1.0))
            .filter(|r| *r > 0.0)
            .unwrap_or(1.0);

        let date = if details.invoice_date.is_empty() {
            today.format("%Y-%m-%d").to_string()
        } else {
            details.invoice_date.clone()
        };

        Self {
            invoice_number: record.invoice_number.clone(),
            date,
            client_name: details.client_name.clone(),
            from_date: details.from_date.clone(),
            to_date: details.to_date.clone(),
            package_type: details.package_type.clone(),
            visa_text: details.visa.clone(),
            transport_text: details.transport.clone(),
            historical_visit: if details.historical_visit { "Yes" } else { "No" }.to_string(),
            pax_count,
            makkah_hotel: details.makkah_hotel_name.clone(),
            makkah_rate: round_money(decimal_or(input.makkah_hotel_rate.as_ref(), 0.0)),
            makkah_nights: count_or(input.nights_in_makkah.as_ref(), 0),
            makkah_cost: round_money(breakdown.makkah_cost),
            madinah_hotel: details.madinah_hotel_name.clone(),
            madinah_rate: round_money(decimal_or(input.madinah_hotel_rate.as_ref(), 0.0)),
            madinah_nights: count_or(input.nights_in_madinah.as_ref(), 0),
            madinah_cost: round_money(breakdown.madinah_cost),
            visa_per_pax: round_money(decimal_or(input.visa_rate.as_ref(), 0.0)),
            visa_total: round_money(breakdown.visa_total),
            ziyarat_per_pax: round_money(decimal_or(input.ziyarat_rate.as_ref(), 0.0)),
            ziyarat_total: round_money(breakdown.ziyarat_total),
            airline_name: details.airline_name.clone(),
            airline_per_pax_pkr: round_money(breakdown.airline_per_pax_pkr),
            airline_total_pkr: round_money(breakdown.airline_total_pkr),
            base_total: round_money(breakdown.base_total),
            profit_percentage: round_money(decimal_or(input.profit_percentage.as_ref(), 0.0)),
            with_profit: round_money(breakdown.with_profit),
            per_pax_sar: round_money(breakdown.per_pax_sar),
            exchange_rate: round_money(exchange_rate),
            per_pax_pkr: round_money(breakdown.per_pax_pkr),
            total_with_profit_pkr: round_money(breakdown.total_with_profit_pkr),
            generated_at: record
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Append-only CSV sheet on disk.
pub struct CumulativeSheet {
    path: PathBuf,
    guard: Mutex<()>,
}

impl CumulativeSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown to users
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| SHEET_FILE_NAME.to_string())
    }

    /// Append records in order. Returns the sheet's total data row count.
    pub fn append(&self, records: &[InvoiceRecord]) -> Result<usize> {
        let _guard = self.guard.lock().unwrap_or_else(|p| p.into_inner());

        let existing = self.count_rows()?;
        let is_new = existing == 0 && !self.has_content()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        let today = Utc::now().date_naive();
        for record in records {
            writer.serialize(SheetRow::from_record(record, today))?;
        }
        writer.flush()?;

        let total = existing + records.len();
        info!(
            "Appended {} invoices to {} ({} rows)",
            records.len(),
            self.path.display(),
            total
        );
        Ok(total)
    }

    /// Data rows currently in the sheet
    pub fn count_rows(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let mut count = 0;
        for record in reader.records() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    fn has_content(&self) -> Result<bool> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() > 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
