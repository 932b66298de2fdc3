//! Record store for generated invoices.
//!
//! Records are write-once: the pricing workflow saves each generated invoice
//! and never updates it. A failed save never invalidates the breakdown; the
//! workflow reports it and carries on.

pub mod queries;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{InvoiceRecord, RecordId};

/// Durable store for invoice records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, record: &InvoiceRecord) -> Result<RecordId>;

    /// Write-then-read connectivity check. Never fails; problems are
    /// reported in the result.
    async fn diagnose(&self) -> DiagnosticReport;
}

/// Result of a record store connectivity check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_trip_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiagnosticReport {
    fn failed(error: impl ToString) -> Self {
        Self {
            ok: false,
            message: "Record store diagnostic failed".to_string(),
            id: None,
            round_trip_ms: None,
            error: Some(error.to_string()),
        }
    }
}

/// PostgreSQL-backed record store (JSONB payloads)
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the tables exist
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        queries::ensure_schema(&pool).await?;
        info!("Connected record store");
        Ok(Self::new(pool))
    }

    async fn probe(&self) -> Result<(Uuid, u64)> {
        let start = Instant::now();
        let id = Uuid::new_v4();

        queries::insert_diagnostic(&self.pool, id, "connectivity test", Utc::now()).await?;
        queries::get_diagnostic(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok((id, start.elapsed().as_millis() as u64))
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn save(&self, record: &InvoiceRecord) -> Result<RecordId> {
        let payload = serde_json::to_value(record)?;
        let id = queries::insert_invoice_record(
            &self.pool,
            Uuid::new_v4(),
            &record.invoice_number,
            &payload,
        )
        .await?;

        info!("Stored invoice {} as {}", record.invoice_number, id);
        Ok(RecordId(id))
    }

    async fn diagnose(&self) -> DiagnosticReport {
        match self.probe().await {
            Ok((id, round_trip_ms)) => DiagnosticReport {
                ok: true,
                message: "Record store write/read succeeded".to_string(),
                id: Some(id),
                round_trip_ms: Some(round_trip_ms),
                error: None,
            },
            Err(e) => {
                warn!("Record store diagnostic failed: {}", e);
                DiagnosticReport::failed(e)
            }
        }
    }
}

/// In-process record store for local runs and tests
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<RecordId, InvoiceRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: RecordId) -> Option<InvoiceRecord> {
        self.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RecordId, InvoiceRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn save(&self, record: &InvoiceRecord) -> Result<RecordId> {
        let id = RecordId(Uuid::new_v4());
        self.lock().insert(id, record.clone());
        Ok(id)
    }

    async fn diagnose(&self) -> DiagnosticReport {
        DiagnosticReport {
            ok: true,
            message: "In-memory record store".to_string(),
            id: None,
            round_trip_ms: Some(0),
            error: None,
        }
    }
}
