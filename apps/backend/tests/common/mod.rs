#![allow(dead_code)]

use std::sync::Arc;

use actix_web::test;
use grader_backend::test_support::ScriptedJudge;
use serde_json::Value;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const VERDICT_A: &str =
    r#"{"winner":"A","scoreA":87,"scoreB":64,"reason":"Player A grouped by color."}"#;

pub fn judge_replying(text: &str) -> Arc<ScriptedJudge> {
    Arc::new(ScriptedJudge::replying(text))
}

pub fn grade_request(body: &Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/grade")
        .insert_header(("content-type", "application/json"))
        .set_payload(body.to_string())
        .to_request()
}
