//! Invoice document route handlers

use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::error::Result;
use crate::pricing::services;
use crate::AppState;

/// Printable invoice page for a staged invoice
pub async fn invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> Result<Html<String>> {
    tracing::debug!("Rendering invoice document {}", invoice_number);
    Ok(Html(services::render_document(&state, &invoice_number)?))
}

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}
