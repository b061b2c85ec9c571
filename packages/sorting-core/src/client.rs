use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::domain::PileStore;
use crate::error::GradeError;
use crate::protocol::{self, GradeRequest, GradeResult, HealthStatus};

/// HTTP client for the scoring service.
///
/// Each submission is a single attempt. Only fully parsed and normalized
/// results reach subscribers; failures are returned to the caller alone.
pub struct GradingClient {
    http: reqwest::Client,
    config: ClientConfig,
    subscribers: Vec<mpsc::UnboundedSender<GradeResult>>,
}

impl GradingClient {
    pub fn new(config: ClientConfig) -> Result<Self, GradeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GradeError::Config {
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            config,
            subscribers: Vec::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Receive every successful result from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<GradeResult> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn build_request(&self, store: &PileStore) -> GradeRequest {
        protocol::build_request(store)
    }

    /// Serialize a finished store and submit it.
    pub async fn grade(&self, store: &PileStore) -> Result<GradeResult, GradeError> {
        let request = self.build_request(store);
        self.submit(&request).await
    }

    pub async fn submit(&self, request: &GradeRequest) -> Result<GradeResult, GradeError> {
        let body = serde_json::to_vec(request).map_err(|e| GradeError::Config {
            detail: format!("failed to serialize grade request: {e}"),
        })?;
        debug!(
            url = %self.config.grade_url,
            body = %String::from_utf8_lossy(&body),
            "submitting piles"
        );

        let response = self
            .http
            .post(&self.config.grade_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| log_failure(GradeError::from_reqwest(e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| log_failure(GradeError::from_reqwest(e)))?;

        if !status.is_success() {
            return Err(log_failure(GradeError::Transport {
                status: Some(status.as_u16()),
                body: Some(text),
                timed_out: false,
                detail: format!("grading service responded with {status}"),
            }));
        }
        info!(status = status.as_u16(), body = %text, "grading response received");

        let result = parse_result(&text).map_err(log_failure)?;
        for subscriber in &self.subscribers {
            let _ = subscriber.send(result.clone());
        }
        Ok(result)
    }

    /// Read-only liveness probe. Never touches grading state.
    pub async fn health_check(&self) -> Result<HealthStatus, GradeError> {
        let response = self
            .http
            .get(&self.config.health_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| log_failure(GradeError::from_reqwest(e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| log_failure(GradeError::from_reqwest(e)))?;

        if !status.is_success() {
            return Err(log_failure(GradeError::Transport {
                status: Some(status.as_u16()),
                body: Some(text),
                timed_out: false,
                detail: format!("health endpoint responded with {status}"),
            }));
        }

        let health: HealthStatus = serde_json::from_str(&text).map_err(|e| {
            log_failure(GradeError::Parse {
                body: text.clone(),
                detail: e.to_string(),
            })
        })?;
        info!(ok = health.ok, version = %health.version, "health check");
        Ok(health)
    }
}

fn parse_result(text: &str) -> Result<GradeResult, GradeError> {
    let value: Value = serde_json::from_str(text).map_err(|e| GradeError::Parse {
        body: text.to_string(),
        detail: e.to_string(),
    })?;
    GradeResult::from_json_value(&value).map_err(|detail| GradeError::Parse {
        body: text.to_string(),
        detail,
    })
}

fn log_failure(err: GradeError) -> GradeError {
    error!(
        kind = %err.kind(),
        status = ?err.status(),
        raw = err.raw_body().unwrap_or(""),
        error = %err,
        "grading request failed"
    );
    err
}
