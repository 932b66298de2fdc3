//! Pricing engine module for Umrah package invoices.
//!
//! Turns raw form inputs into a SAR/PKR invoice breakdown, plus the
//! workflow and HTTP routes that stage, store and export the result.

pub mod calculators;
pub mod coercion;
pub mod formatting;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_invoice, round_money};
pub use coercion::FieldValue;
pub use formatting::{format_currency, format_sar, generate_invoice_number};
pub use models::{InvoiceBreakdown, InvoiceInput};
pub use routes::router;
