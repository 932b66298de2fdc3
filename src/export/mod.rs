//! Invoice exports: the cumulative sheet and the printable document.

pub mod document;
pub mod sheet;

pub use document::InvoiceDocument;
pub use sheet::{CumulativeSheet, SheetRow, SHEET_FILE_NAME, SHEET_HEADERS};
