use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::judge::JudgeError;
use crate::trace_ctx;

/// Body of every failure response: `{"error": ..., "raw"?: ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Upstream judge error: {detail}")]
    UpstreamJudge { detail: String, raw: Option<String> },
    #[error("Judge output error: {detail}")]
    JudgeOutput { detail: String, raw: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::BadRequest { code, .. } => *code,
            AppError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            AppError::UpstreamJudge { .. } => ErrorCode::UpstreamJudge,
            AppError::JudgeOutput { .. } => ErrorCode::InvalidJudgeOutput,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::PayloadTooLarge { limit } => {
                format!("Request body exceeds {limit} bytes")
            }
            AppError::UpstreamJudge { detail, .. } => detail.clone(),
            AppError::JudgeOutput { detail, .. } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
        }
    }

    fn raw(&self) -> Option<String> {
        match self {
            AppError::UpstreamJudge { raw, .. } => raw.clone(),
            AppError::JudgeOutput { raw, .. } => Some(raw.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UpstreamJudge { .. } => StatusCode::BAD_GATEWAY,
            AppError::JudgeOutput { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<JudgeError> for AppError {
    fn from(err: JudgeError) -> Self {
        match err {
            JudgeError::Config(detail) => AppError::Config { detail },
            JudgeError::Status { status, body } => AppError::UpstreamJudge {
                detail: format!("Judge request failed with status {status}"),
                raw: Some(body),
            },
            JudgeError::Transport(detail) => AppError::UpstreamJudge {
                detail: format!("Judge request failed: {detail}"),
                raw: None,
            },
            JudgeError::Envelope { detail, body } => AppError::UpstreamJudge {
                detail: format!("Judge response could not be decoded: {detail}"),
                raw: Some(body),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            error: self.detail(),
            raw: self.raw(),
        };

        HttpResponse::build(self.status())
            .insert_header(("x-trace-id", trace_ctx::trace_id()))
            .insert_header(("x-error-code", self.code().as_str()))
            .json(body)
    }
}
