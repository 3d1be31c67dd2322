//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use forecast_workflow::JurisdictionTable;

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Forecasting model endpoint; forecasts are skipped when unset
    pub forecast_url: Option<String>,
    /// Per-request timeout for the forecasting model
    pub forecast_timeout_secs: u64,
    /// Retries on transient forecasting failures before giving up
    pub forecast_max_retries: u32,
    /// Optional JSON file replacing the built-in city → state table
    pub jurisdictions_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./forecast_projects.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid API_PORT".to_string()))?,
            forecast_url: env_var("FORECAST_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            forecast_timeout_secs: env_var("FORECAST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid FORECAST_TIMEOUT_SECS".to_string()))?,
            forecast_max_retries: env_var("FORECAST_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid FORECAST_MAX_RETRIES".to_string()))?,
            jurisdictions_file: env_var("JURISDICTIONS_FILE").ok().map(PathBuf::from),
        })
    }

    /// Load the jurisdiction table, falling back to the built-in one.
    pub fn load_jurisdictions(&self) -> Result<JurisdictionTable> {
        let Some(path) = &self.jurisdictions_file else {
            return Ok(JurisdictionTable::india());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ApiError::Config(format!("Cannot read JURISDICTIONS_FILE {}: {e}", path.display()))
        })?;
        let table = JurisdictionTable::from_json(&raw)?;
        if table.entries().is_empty() {
            return Err(ApiError::Config(
                "JURISDICTIONS_FILE lists no states".to_string(),
            ));
        }
        Ok(table)
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ApiError::Config(format!("Missing env var: {key}")))
}
