use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Judge, JudgeError};

/// Judge backed by the OpenAI Responses API (`POST {base}/responses`).
pub struct OpenAiJudge {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    temperature: f32,
}

#[derive(Deserialize)]
struct ResponsesEnvelope {
    #[serde(default)]
    output: Vec<OutputEntry>,
}

#[derive(Deserialize)]
struct OutputEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Vec<ContentEntry>,
}

#[derive(Deserialize)]
struct ContentEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesEnvelope {
    /// First `output_text` of the first `message` entry, or empty.
    fn assistant_text(self) -> String {
        self.output
            .into_iter()
            .find(|entry| entry.kind == "message")
            .and_then(|message| {
                message
                    .content
                    .into_iter()
                    .find(|content| content.kind == "output_text")
            })
            .and_then(|content| content.text)
            .unwrap_or_default()
    }
}

impl OpenAiJudge {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JudgeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
            api_key,
            model: model.into(),
        })
    }
}

#[async_trait]
impl Judge for OpenAiJudge {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        let body = ResponsesRequest {
            model: &self.model,
            input: prompt,
            temperature: 0.0,
        };

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        debug!(model = %self.model, endpoint = %self.endpoint, "calling judge model");
        let response = request
            .send()
            .await
            .map_err(|e| JudgeError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| JudgeError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "judge model returned an error");
            return Err(JudgeError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: ResponsesEnvelope =
            serde_json::from_str(&text).map_err(|e| JudgeError::Envelope {
                detail: e.to_string(),
                body: text.clone(),
            })?;
        Ok(envelope.assistant_text())
    }
}
