//! HTTP routes for the invoice JSON API.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::db::DiagnosticReport;
use crate::error::Result;
use crate::AppState;

use super::models::InvoiceInput;
use super::requests::GenerateInvoiceRequest;
use super::responses::{
    CalculationResponse, CommitResponse, GenerateInvoiceResponse, StagingCountResponse,
    StagingListResponse,
};
use super::services;

/// Build the invoice API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/invoices/calculate", post(calculate))
        .route("/api/invoices", post(generate))
        .route("/api/staging", get(list_staged).delete(clear_staged))
        .route("/api/staging/commit", post(commit_staged))
        .route("/api/staging/:invoice_number", delete(remove_staged))
        .route("/api/store/diagnostics", get(diagnostics))
}

/// POST /api/invoices/calculate
async fn calculate(Json(input): Json<InvoiceInput>) -> Json<CalculationResponse> {
    Json(services::preview(&input))
}

/// POST /api/invoices
async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateInvoiceRequest>,
) -> Result<Json<GenerateInvoiceResponse>> {
    Ok(Json(services::generate_invoice(&state, request).await?))
}

/// GET /api/staging
async fn list_staged(State(state): State<AppState>) -> Json<StagingListResponse> {
    let invoices = state.staging.get_all();
    Json(StagingListResponse {
        count: invoices.len(),
        invoices,
    })
}

/// DELETE /api/staging
async fn clear_staged(State(state): State<AppState>) -> Result<Json<StagingCountResponse>> {
    state.staging.clear()?;
    tracing::info!("Staging buffer cleared");
    Ok(Json(StagingCountResponse { staged_count: 0 }))
}

/// DELETE /api/staging/:invoice_number
async fn remove_staged(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> Result<Json<StagingCountResponse>> {
    let staged_count = state.staging.remove(&invoice_number)?;
    Ok(Json(StagingCountResponse { staged_count }))
}

/// POST /api/staging/commit
async fn commit_staged(State(state): State<AppState>) -> Result<Json<CommitResponse>> {
    Ok(Json(services::commit_staged(&state)?))
}

/// GET /api/store/diagnostics
async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticReport> {
    Json(state.records.diagnose().await)
}
