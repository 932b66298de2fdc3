//! Runtime configuration from the environment (and `.env`).

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::export::SHEET_FILE_NAME;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// PostgreSQL record store; in-memory store when unset
    pub database_url: Option<String>,
    /// JSON staging file; in-memory staging when unset
    pub staging_file: Option<PathBuf>,
    pub sheet_path: PathBuf,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR: {}", e)))?;

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            staging_file: get("STAGING_FILE").map(PathBuf::from),
            sheet_path: get("SHEET_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(SHEET_FILE_NAME)),
        })
    }
}
