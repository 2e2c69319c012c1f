//! End-to-end batch tests
//!
//! Drive [`ClipMagicClient`] against a wiremock server and check batch
//! ordering, failure policies, timeouts, and result records.

use std::time::Duration;

use clipmagic_rs::{BatchItem, ClipMagicClient, ConfigBuilder, ItemOutcome, OperationKind};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, continue_on_failure: bool) -> ClipMagicClient {
    let config = ConfigBuilder::new()
        .api_key("test-key")
        .base_url(server.uri())
        .continue_on_failure(continue_on_failure)
        .build();
    ClipMagicClient::new(config).unwrap()
}

fn items(values: Vec<serde_json::Value>) -> Vec<BatchItem> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| BatchItem::from_value(i, v).unwrap())
        .collect()
}

#[tokio::test]
async fn continue_mode_yields_one_result_per_item_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/operations/compress"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let client = client_for(&server, true);
    let batch = items(vec![
        json!({"operation": "convert", "url": "https://example.com/a.mp4", "outputFormat": "mp3"}),
        json!({"operation": "compress", "url": "https://example.com/b.mp4", "preset": "fast", "crf": 23, "outputFormat": "mp4"}),
        json!({"operation": "convert", "url": "https://example.com/c.mp4", "outputFormat": "wav"}),
    ]);

    let results = client.run_batch(&batch).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(
        results.iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(results[0].is_success());
    assert!(!results[1].is_success());
    assert!(results[2].is_success());

    let record = results[1].to_record();
    assert_eq!(record["success"], json!(false));
    assert!(record["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn strict_mode_aborts_on_first_failure() {
    let server = MockServer::start().await;
    let convert_guard = Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job": "ok"})))
        .expect(0)
        .named("convert must not run after abort")
        .mount_as_scoped(&server)
        .await;

    let client = client_for(&server, false);
    let batch = items(vec![
        // Missing the required url parameter, fails during compilation.
        json!({"operation": "trim", "trimMode": "single"}),
        json!({"operation": "convert", "url": "https://example.com/a.mp4", "outputFormat": "mp3"}),
    ]);

    let err = client.run_batch(&batch).await.unwrap_err();
    assert!(err.is_compile_error());
    drop(convert_guard);
}

#[tokio::test]
async fn unknown_operation_is_recorded_in_continue_mode() {
    let server = MockServer::start().await;
    let client = client_for(&server, true);
    let batch = items(vec![json!({"operation": "transmogrify", "url": "x"})]);

    let results = client.run_batch(&batch).await.unwrap();
    assert_eq!(results.len(), 1);
    match &results[0].outcome {
        ItemOutcome::Failure { message } => assert!(message.contains("transmogrify")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn binary_result_record_carries_filename_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workflows/generate-clips"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"clipbytes".to_vec(), "video/mp4")
                .insert_header("content-disposition", r#"attachment; filename="best.mp4""#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, false);
    let batch = items(vec![json!({
        "operation": "generateClips",
        "url": "https://example.com/a.mp4",
        "subtitles": false,
    })]);

    let results = client.run_batch(&batch).await.unwrap();
    let record = results[0].to_record();
    assert_eq!(record["success"], json!(true));
    assert_eq!(record["operation"], json!(OperationKind::GenerateClips.as_str()));
    assert_eq!(record["filename"], json!("best.mp4"));
    assert_eq!(record["contentType"], json!("video/mp4"));
}

#[tokio::test]
async fn item_timeout_overrides_default_and_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"job": "ok"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, true);
    let batch = items(vec![json!({
        "operation": "convert",
        "url": "https://example.com/a.mp4",
        "outputFormat": "mp3",
        "timeout": 100,
    })]);

    let results = client.run_batch(&batch).await.unwrap();
    match &results[0].outcome {
        ItemOutcome::Failure { message } => assert!(message.contains("timed out")),
        other => panic!("expected timeout failure, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_batch_yields_no_results() {
    let server = MockServer::start().await;
    let client = client_for(&server, false);
    let results = client.run_batch(&[]).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn execute_returns_a_single_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/stitch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job": "queued"})))
        .mount(&server)
        .await;

    let client = client_for(&server, false);
    let item = BatchItem::from_value(
        0,
        json!({
            "operation": "stitch",
            "urls": "https://a.mp4, https://b.mp4",
            "outputFormat": "mp4",
        }),
    )
    .unwrap();

    let result = client.execute(&item).await.unwrap();
    assert!(result.is_success());
    let record = result.to_record();
    assert_eq!(record["job"], json!("queued"));
}
