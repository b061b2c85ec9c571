mod common;

use actix_web::test;
use grader_backend::test_support::create_test_app;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_health_endpoint() {
    let app = create_test_app(common::judge_replying(common::VERDICT_A))
        .build()
        .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().get("x-request-id").is_some());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"ok": true, "version": "v4-head-to-head-A123-vs-B456"})
    );
}

#[actix_web::test]
async fn test_health_does_not_call_the_judge() {
    let judge = common::judge_replying(common::VERDICT_A);
    let app = create_test_app(judge.clone()).build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    test::call_service(&app, req).await;

    assert!(judge.prompts().is_empty());
}

#[actix_web::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = create_test_app(common::judge_replying(common::VERDICT_A))
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("origin", "http://game.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().get("access-control-allow-origin").is_some());
}

#[actix_web::test]
async fn test_cors_preflight_for_grade() {
    let app = create_test_app(common::judge_replying(common::VERDICT_A))
        .with_cors_origins(&["http://allowed.example"])
        .build()
        .await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/grade")
        .insert_header(("origin", "http://allowed.example"))
        .insert_header(("access-control-request-method", "POST"))
        .insert_header(("access-control-request-headers", "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "http://allowed.example"
    );
}
