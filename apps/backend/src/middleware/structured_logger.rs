//! Access log: one `request_completed` event per request.
//!
//! Handlers can attach a [`GradeSummary`] to the request; its fields are
//! added to the event so each `/grade` line shows what was judged.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::trace_ctx;

/// What a `/grade` request carried and how it was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeSummary {
    /// Items across the six canonical piles.
    pub items: usize,
    /// `None` until a verdict was parsed.
    pub winner: Option<&'static str>,
}

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let line = AccessLine {
            method: req.method().to_string(),
            path: req.path().to_string(),
        };
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let (status, summary) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request().extensions().get::<GradeSummary>().copied(),
                ),
                Err(err) => (err.as_response_error().status_code(), None),
            };
            line.emit(status, summary, start.elapsed().as_micros() as u64);
            result
        })
    }
}

struct AccessLine {
    method: String,
    path: String,
}

impl AccessLine {
    fn emit(&self, status: StatusCode, summary: Option<GradeSummary>, duration_us: u64) {
        let trace_id = trace_ctx::trace_id();
        let status_code = status.as_u16();
        let items = summary.map(|s| s.items);
        let winner = summary.and_then(|s| s.winner);

        macro_rules! completed {
            ($level:ident) => {
                $level!(
                    http.method = %self.method,
                    url.path = %self.path,
                    http.status_code = status_code,
                    duration_us,
                    trace_id = %trace_id,
                    grade.items = items,
                    grade.winner = winner,
                    "request_completed"
                )
            };
        }

        if status.is_server_error() {
            completed!(error);
        } else if status.is_client_error() {
            completed!(warn);
        } else {
            completed!(info);
        }
    }
}
