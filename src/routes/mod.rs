//! Page routes

pub mod documents;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(documents::health))
        .route("/invoices/:invoice_number", get(documents::invoice))
}
