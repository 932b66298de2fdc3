//! Umrah package invoice engine.
//!
//! The pricing engine ([`pricing::calculate_invoice`]) is a pure function
//! from raw form inputs to a SAR/PKR breakdown. Around it sit the injected
//! collaborators: a staging buffer, a record store, the cumulative sheet
//! and the printable document, plus the HTTP routes exposing them.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod staging;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::RecordStore;
use crate::export::CumulativeSheet;
use crate::staging::StagingStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub staging: Arc<dyn StagingStore>,
    pub sheet: Arc<CumulativeSheet>,
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(pricing::router())
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
