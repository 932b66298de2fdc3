//! Database queries for invoice records

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// Create the record tables if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoice_records (
            id UUID PRIMARY KEY,
            invoice_number TEXT NOT NULL,
            payload JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS store_diagnostics (
            id UUID PRIMARY KEY,
            note TEXT NOT NULL,
            ts_client TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert an invoice record; records are never updated afterwards
pub async fn insert_invoice_record(
    pool: &PgPool,
    id: Uuid,
    invoice_number: &str,
    payload: &serde_json::Value,
) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO invoice_records (id, invoice_number, payload)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(invoice_number)
    .bind(payload)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Write a diagnostic probe row
pub async fn insert_diagnostic(
    pool: &PgPool,
    id: Uuid,
    note: &str,
    ts_client: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO store_diagnostics (id, note, ts_client)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(id)
    .bind(note)
    .bind(ts_client)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read a diagnostic probe row back
pub async fn get_diagnostic(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<(String, DateTime<Utc>)>> {
    let row = sqlx::query_as::<_, (String, DateTime<Utc>)>(
        r#"
        SELECT note, ts_client
        FROM store_diagnostics
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
