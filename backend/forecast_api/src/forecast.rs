//! Forecasting model client. Sends project attributes and reads back the
//! forecast demand per material.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the model returns 429 or a 5xx
//!   response, or the request fails to reach it, up to [`MAX_BACKOFF_SECS`]
//!   seconds between attempts.
//! * After `max_retries` retries the last failure is returned; the caller
//!   does not save the project.

use std::time::Duration;

use forecast_workflow::ProjectAttributes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::errors::{ApiError, Result};
use crate::models::Forecasts;

const MAX_BACKOFF_SECS: u64 = 30;
const INITIAL_BACKOFF_SECS: u64 = 1;

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub forecasts: Option<Forecasts>,
    pub error: Option<String>,
}

/// Settings for reaching the forecasting model.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    pub client: Client,
    pub url: Option<String>,
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl ForecastClient {
    pub fn new(client: Client, url: Option<String>, max_retries: u32) -> Self {
        Self {
            client,
            url,
            max_retries,
            initial_backoff: Duration::from_secs(INITIAL_BACKOFF_SECS),
        }
    }

    /// Ask the model for a forecast.
    ///
    /// Returns `Ok(None)` when no model is configured.
    pub async fn forecast(&self, attributes: &ProjectAttributes) -> Result<Option<Forecasts>> {
        let Some(url) = self.url.as_deref() else {
            debug!("No FORECAST_URL configured; skipping forecast");
            return Ok(None);
        };

        let mut backoff = self.initial_backoff;
        let mut attempt = 0u32;

        loop {
            let outcome = self.request_once(url, attributes).await;
            match outcome {
                Ok(forecasts) => {
                    debug!("Forecast received for {} materials", forecasts.len());
                    return Ok(Some(forecasts));
                }
                Err(Attempt::Fatal(e)) => return Err(e),
                Err(Attempt::Transient(reason)) => {
                    if attempt >= self.max_retries {
                        return Err(ApiError::Forecast(format!(
                            "gave up after {} attempts: {reason}",
                            attempt + 1
                        )));
                    }
                    warn!(
                        "Forecast request failed (will retry in {}s): {reason}",
                        backoff.as_secs_f32()
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(Duration::from_secs(MAX_BACKOFF_SECS));
                    attempt += 1;
                }
            }
        }
    }

    async fn request_once(
        &self,
        url: &str,
        attributes: &ProjectAttributes,
    ) -> std::result::Result<Forecasts, Attempt> {
        let response = self
            .client
            .post(url)
            .json(&json!({ "input_features": attributes }))
            .send()
            .await
            .map_err(|e| Attempt::Transient(e.to_string()))?;

        let status = response.status();
        if is_transient(status) {
            return Err(Attempt::Transient(format!("HTTP {status}")));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Fatal(ApiError::Forecast(format!("malformed response: {e}"))))?;

        if !status.is_success() {
            let message = body.error.unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Attempt::Fatal(ApiError::Forecast(message)));
        }

        body.forecasts.ok_or_else(|| {
            Attempt::Fatal(ApiError::Forecast(
                "response contained no forecasts".to_string(),
            ))
        })
    }
}

/// Outcome of a single failed request.
enum Attempt {
    Transient(String),
    Fatal(ApiError),
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
