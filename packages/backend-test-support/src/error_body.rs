//! Assertions for the grader's error responses.
//!
//! Every non-2xx response carries `{"error": string, "raw"?: string}`, an
//! `x-error-code` header and an `x-trace-id` header. These helpers check
//! that contract without depending on backend types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde_json::Value;

/// Check status, headers and body shape; returns the parsed body so callers
/// can inspect `raw`.
pub fn assert_error_body_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
    expected_error_contains: Option<&str>,
) -> Value {
    assert_eq!(status, expected_status);

    let body: Value =
        serde_json::from_slice(body_bytes).expect("error body should be valid JSON");
    let error = body
        .get("error")
        .and_then(Value::as_str)
        .expect("error body should carry a string 'error' field");

    if let Some(raw) = body.get("raw") {
        assert!(raw.is_string(), "'raw' should be a string, got {raw}");
    }

    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id should not be empty");

    let code = headers
        .get("x-error-code")
        .expect("x-error-code header should be present")
        .to_str()
        .expect("x-error-code header should be valid UTF-8");
    assert_eq!(code, expected_code);

    if let Some(expected) = expected_error_contains {
        assert!(
            error.contains(expected),
            "Expected error to contain '{expected}', but got '{error}'"
        );
    }

    body
}

/// [`assert_error_body_from_parts`] over an `actix_web::test` response.
pub async fn assert_error_response<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_error_contains: Option<&str>,
) -> Value
where
    B: MessageBody,
{
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_error_body_from_parts(
        status,
        &headers,
        &body,
        expected_status,
        expected_code,
        expected_error_contains,
    )
}
