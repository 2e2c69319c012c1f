//! HTTP transport integration tests
//!
//! Verify the wire contract against a scripted server: credential header
//! injection, GET query strings, POST JSON bodies, and response
//! classification of binary and JSON payloads.

use clipmagic_rs::{classifier, compiler};
use clipmagic_rs::{
    BatchItem, ClassifiedResult, ConfigBuilder, HttpTransport, OperationKind, Transport,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> HttpTransport {
    let config = ConfigBuilder::new()
        .api_key("test-key")
        .base_url(server.uri())
        .build();
    HttpTransport::new(config).unwrap()
}

fn item(parameters: serde_json::Value) -> BatchItem {
    BatchItem::from_value(0, parameters).unwrap()
}

#[tokio::test]
async fn get_requests_carry_query_and_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .and(query_param("url", "https://example.com/in.mp4"))
        .and(query_param("output_format", "mp3"))
        .and(query_param("bitrate_kbps", "500"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job": "queued"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = compiler::compile(
        OperationKind::Convert,
        &item(json!({
            "url": "https://example.com/in.mp4",
            "outputFormat": "mp3",
            "bitrateKbps": 500,
        })),
    )
    .unwrap();

    let response = transport_for(&server).dispatch(&request, None).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn post_requests_send_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/compress"))
        .and(header("x-api-key", "test-key"))
        .and(body_json(json!({
            "url": "https://example.com/in.mp4",
            "preset": "fast",
            "crf": 23,
            "output_format": "mp4",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job": "queued"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = compiler::compile(
        OperationKind::Compress,
        &item(json!({
            "url": "https://example.com/in.mp4",
            "preset": "fast",
            "crf": 23,
            "outputFormat": "mp4",
        })),
    )
    .unwrap();

    let response = transport_for(&server).dispatch(&request, None).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn binary_response_classifies_with_filename() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/compress"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"\x00\x01binary".to_vec(), "video/mp4")
                .insert_header("content-disposition", r#"attachment; filename="clip.mp4""#),
        )
        .mount(&server)
        .await;

    let request = compiler::compile(
        OperationKind::Compress,
        &item(json!({
            "url": "https://example.com/in.mp4",
            "preset": "fast",
            "crf": 23,
            "outputFormat": "mp4",
        })),
    )
    .unwrap();

    let response = transport_for(&server).dispatch(&request, None).await.unwrap();
    let classified = classifier::classify(&response.headers, &response.body);

    match classified {
        ClassifiedResult::Binary {
            payload,
            filename,
            content_type,
        } => {
            assert_eq!(&payload[..], b"\x00\x01binary");
            assert_eq!(filename, "clip.mp4");
            assert_eq!(content_type, "video/mp4");
        }
        other => panic!("expected binary result, got {:?}", other),
    }
}

#[tokio::test]
async fn undecodable_json_response_degrades_to_raw() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"not-json".to_vec(), "text/plain"))
        .mount(&server)
        .await;

    let request = compiler::compile(
        OperationKind::Convert,
        &item(json!({"url": "https://example.com/in.mp4", "outputFormat": "mp3"})),
    )
    .unwrap();

    let response = transport_for(&server).dispatch(&request, None).await.unwrap();
    let classified = classifier::classify(&response.headers, &response.body);

    assert_eq!(
        classified,
        ClassifiedResult::Json(json!({"raw": "not-json"}))
    );
}
