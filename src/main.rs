//! Umrah invoice service entry point.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use umrah_invoice::config::Config;
use umrah_invoice::db::{MemoryRecordStore, PgRecordStore, RecordStore};
use umrah_invoice::export::CumulativeSheet;
use umrah_invoice::staging::{JsonFileStagingStore, MemoryStagingStore, StagingStore};
use umrah_invoice::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "umrah_invoice=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let records: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => Arc::new(PgRecordStore::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set, records are kept in memory only");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let staging: Arc<dyn StagingStore> = match &config.staging_file {
        Some(path) => {
            info!("Staging buffer at {}", path.display());
            Arc::new(JsonFileStagingStore::new(path.clone()))
        }
        None => Arc::new(MemoryStagingStore::new()),
    };

    let state = AppState {
        records,
        staging,
        sheet: Arc::new(CumulativeSheet::new(config.sheet_path.clone())),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
