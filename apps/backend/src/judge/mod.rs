//! Language-model judging: prompt construction, the model adapter, and
//! sanitizing of what the model says back.

pub mod openai;
pub mod output;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiJudge;

/// Failures talking to the judge model.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("judge request failed: {0}")]
    Transport(String),
    #[error("judge responded with HTTP {status}")]
    Status { status: u16, body: String },
    #[error("judge response envelope could not be decoded: {detail}")]
    Envelope { detail: String, body: String },
    #[error("judge is misconfigured: {0}")]
    Config(String),
}

/// A model that reads a judging prompt and answers with free text that
/// should contain the verdict JSON.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError>;
}
