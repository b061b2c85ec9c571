mod common;

use std::time::Duration;

use serde_json::json;
use sorting_core::{ClientConfig, GradeErrorKind, GradingClient, PileStore, Sequence, Winner};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{items, unshuffled};

fn client_for(server: &MockServer) -> GradingClient {
    GradingClient::new(ClientConfig {
        grade_url: format!("{}/grade", server.uri()),
        health_url: format!("{}/health", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

/// Run a short round to completion with the pure state machine.
fn finished_store() -> PileStore {
    let mut seq = Sequence::new(items(3), &unshuffled()).unwrap();
    seq.start();
    for pile in [1, 4, 4] {
        seq.resume();
        seq.sort_current_into_pile(pile).unwrap();
    }
    seq.resume();
    assert!(seq.is_finished());
    seq.piles().clone()
}

#[tokio::test]
async fn test_grade_posts_piles_and_delivers_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/grade"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"piles": {
            "1": ["item1"], "2": [], "3": [], "4": ["item2", "item3"], "5": [], "6": [],
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "winner": "A", "scoreA": 87, "scoreB": 64, "reason": "Tighter themes.",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let mut results = client.subscribe();
    let result = client.grade(&finished_store()).await.unwrap();

    assert_eq!(result.winner, Winner::A);
    assert_eq!(result.score_a, 87.0);
    assert_eq!(result.score_b, 64.0);
    assert_eq!(result.reason, "Tighter themes.");
    assert_eq!(results.try_recv().unwrap(), result);
}

#[tokio::test]
async fn test_out_of_contract_result_is_normalized_before_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/grade"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "winner": "b", "scoreA": -5, "scoreB": 150,
        })))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let mut results = client.subscribe();
    let result = client.grade(&PileStore::new(6)).await.unwrap();

    assert_eq!(result.winner, Winner::B);
    assert_eq!(result.score_a, 0.0);
    assert_eq!(result.score_b, 100.0);
    assert_eq!(result.reason, "");
    assert_eq!(results.try_recv().unwrap().winner, Winner::B);
}

#[tokio::test]
async fn test_server_error_is_transport_error_without_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/grade"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "judge exploded"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let mut results = client.subscribe();
    let err = client.grade(&finished_store()).await.unwrap_err();

    assert_eq!(err.kind(), GradeErrorKind::TransportError);
    assert_eq!(err.status(), Some(500));
    assert!(err.raw_body().unwrap().contains("judge exploded"));
    assert!(results.try_recv().is_err());
}

#[tokio::test]
async fn test_unparsable_body_is_parse_error_without_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/grade"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let mut results = client.subscribe();
    let err = client.grade(&finished_store()).await.unwrap_err();

    assert_eq!(err.kind(), GradeErrorKind::ParseError);
    assert_eq!(err.raw_body(), Some("<html>oops</html>"));
    assert!(results.try_recv().is_err());
}

#[tokio::test]
async fn test_slow_server_times_out_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/grade"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"winner": "A", "scoreA": 1, "scoreB": 2}))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GradingClient::new(ClientConfig {
        grade_url: format!("{}/grade", server.uri()),
        health_url: format!("{}/health", server.uri()),
        timeout: Duration::from_millis(200),
    })
    .unwrap();
    let err = client.grade(&finished_store()).await.unwrap_err();

    assert_eq!(err.kind(), GradeErrorKind::TransportError);
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = GradingClient::new(ClientConfig {
        grade_url: "http://127.0.0.1:9/grade".into(),
        health_url: "http://127.0.0.1:9/health".into(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = client.grade(&PileStore::new(6)).await.unwrap_err();
    assert_eq!(err.kind(), GradeErrorKind::TransportError);
    assert_eq!(err.status(), None);

    let err = client.health_check().await.unwrap_err();
    assert_eq!(err.kind(), GradeErrorKind::TransportError);
}

#[tokio::test]
async fn test_health_check_reads_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "version": "v4-head-to-head-A123-vs-B456"})),
        )
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let mut results = client.subscribe();
    let health = client.health_check().await.unwrap();

    assert!(health.ok);
    assert_eq!(health.version, "v4-head-to-head-A123-vs-B456");
    assert!(results.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_health_check_does_not_block_grading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/grade"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "winner": "Tie", "scoreA": 50, "scoreB": 50, "reason": "Even.",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.health_check().await.unwrap_err();
    assert_eq!(err.status(), Some(503));

    let result = client.grade(&finished_store()).await.unwrap();
    assert_eq!(result.winner, Winner::Tie);
}
