//! Data models

pub mod invoice;

pub use invoice::{InvoiceDetails, InvoiceRecord, RecordId};
