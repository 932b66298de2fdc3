//! Staging buffer for generated invoices.
//!
//! Invoices accumulate here until the user commits them to the cumulative
//! sheet. The buffer is ordered by first insertion and keyed by invoice
//! number: adding a record with a known number replaces it in place.
//! Not transactional; concurrent writers get last-write-wins. Writes that
//! cannot be persisted are reported to the caller.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::InvoiceRecord;

/// Ordered, keyed buffer of staged invoices.
pub trait StagingStore: Send + Sync {
    /// Insert or replace by invoice number. Returns the buffer length.
    fn add(&self, record: InvoiceRecord) -> Result<usize>;

    fn get_all(&self) -> Vec<InvoiceRecord>;

    fn get(&self, invoice_number: &str) -> Option<InvoiceRecord> {
        self.get_all()
            .into_iter()
            .find(|r| r.invoice_number == invoice_number)
    }

    fn clear(&self) -> Result<()>;

    /// Drop the record with this number, if any. Returns the buffer length.
    fn remove(&self, invoice_number: &str) -> Result<usize>;
}

/// Amounts that JSON cannot carry would come back as `null` and spoil the
/// whole buffer on the next read.
fn ensure_finite(record: &InvoiceRecord) -> Result<()> {
    if record.breakdown.amounts().iter().all(|a| a.is_finite()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invoice {} has amounts out of range",
            record.invoice_number
        )))
    }
}

fn upsert(list: &mut Vec<InvoiceRecord>, record: InvoiceRecord) {
    match list
        .iter_mut()
        .find(|r| r.invoice_number == record.invoice_number)
    {
        Some(existing) => *existing = record,
        None => list.push(record),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local staging buffer.
#[derive(Default)]
pub struct MemoryStagingStore {
    records: Mutex<Vec<InvoiceRecord>>,
}

impl MemoryStagingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StagingStore for MemoryStagingStore {
    fn add(&self, record: InvoiceRecord) -> Result<usize> {
        ensure_finite(&record)?;
        let mut records = lock(&self.records);
        upsert(&mut records, record);
        Ok(records.len())
    }

    fn get_all(&self) -> Vec<InvoiceRecord> {
        lock(&self.records).clone()
    }

    fn clear(&self) -> Result<()> {
        lock(&self.records).clear();
        Ok(())
    }

    fn remove(&self, invoice_number: &str) -> Result<usize> {
        let mut records = lock(&self.records);
        records.retain(|r| r.invoice_number != invoice_number);
        Ok(records.len())
    }
}

/// Staging buffer persisted as a JSON array so it survives restarts.
///
/// A missing, unreadable or corrupt file reads as an empty buffer. Write
/// failures are returned; the file keeps its previous contents.
pub struct JsonFileStagingStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStagingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn load(&self) -> Vec<InvoiceRecord> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read staging file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<InvoiceRecord>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Ignoring unreadable staging file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn persist(&self, records: &[InvoiceRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("Failed to write staging file {}: {}", self.path.display(), e);
            return Err(e.into());
        }

        debug!("Staging file {} holds {} invoices", self.path.display(), records.len());
        Ok(())
    }
}

impl StagingStore for JsonFileStagingStore {
    fn add(&self, record: InvoiceRecord) -> Result<usize> {
        ensure_finite(&record)?;
        let _guard = lock(&self.guard);
        let mut records = self.load();
        upsert(&mut records, record);
        self.persist(&records)?;
        Ok(records.len())
    }

    fn get_all(&self) -> Vec<InvoiceRecord> {
        let _guard = lock(&self.guard);
        self.load()
    }

    fn clear(&self) -> Result<()> {
        let _guard = lock(&self.guard);
        self.persist(&[])
    }

    fn remove(&self, invoice_number: &str) -> Result<usize> {
        let _guard = lock(&self.guard);
        let mut records = self.load();
        records.retain(|r| r.invoice_number != invoice_number);
        self.persist(&records)?;
        Ok(records.len())
    }
}
