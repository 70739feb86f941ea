// src/service/http.rs

use reqwest::Client;
use std::time::Instant;

use crate::config::AppConfig;
use crate::errors::{Result, WaznError};
use crate::models::{AnalysisRequest, AnalysisResponse};
use crate::service::AnalysisService;

/// Talks to the analysis service over HTTP.
#[derive(Clone)]
pub struct HttpAnalysisService {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisService {
    /// Creates a new `HttpAnalysisService` with a shared client.
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
        }
    }

    /// Builds the client from config, applying the timeout when one is set.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, config))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AnalysisService for HttpAnalysisService {
    /// POSTs `{"text": ...}` and decodes the body.
    ///
    /// The body is decoded whatever the status, since the service may report
    /// `ok: false` with a 4xx. A non-success status whose body is not a
    /// valid response becomes `ApiError`.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        log::info!("📡 Calling analysis service: {}", self.endpoint);

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Analysis service response status: {} ({}ms)", status, latency_ms);

        match serde_json::from_str::<AnalysisResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(WaznError::ApiError {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(WaznError::JsonParse(e)),
        }
    }
}
