//! End-to-end tests through a mockito HTTP server: typed response decoding,
//! auth header, remote error mapping, and recoverable payload failures.

use docclassify::{batch, ClassifyClientBuilder, Dispatcher, DispatcherConfig, Error};
use std::sync::Arc;

const RESPONSE_BODY: &str = r#"[
    {
        "text": "aabb",
        "external_id": null,
        "error": false,
        "classifications": [
            {"tag_name": "Positive", "tag_id": 1, "confidence": 0.91}
        ]
    }
]"#;

#[tokio::test]
async fn test_classify_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v3/classifiers/cl_test/classify/")
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RESPONSE_BODY)
        .expect(2)
        .create_async()
        .await;

    let client = ClassifyClientBuilder::new()
        .token("test-token")
        .base_url_override(server.url())
        .build()
        .unwrap();

    let batches = batch::split(vec!["aabb".to_string(), "bbaa".to_string()], 1).unwrap();
    let dispatcher = Dispatcher::new(DispatcherConfig::from_rpm(6000.0).unwrap());
    let mut outcomes = dispatcher.dispatch(batches, "cl_test", Arc::new(client));

    let mut successes = 0;
    while let Some(outcome) = outcomes.recv().await {
        let response = outcome.result.expect("classification should succeed");
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0].classifications[0].tag_name, "Positive");
        successes += 1;
    }
    assert_eq!(successes, 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_error_maps_status_and_retryable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v3/classifiers/cl_test/classify/")
        .with_status(429)
        .with_body(r#"{"detail": "Request was throttled"}"#)
        .create_async()
        .await;

    let client = ClassifyClientBuilder::new()
        .token("test-token")
        .base_url_override(server.url())
        .build()
        .unwrap();

    let batches = batch::split(vec!["aabb".to_string()], 1).unwrap();
    let dispatcher = Dispatcher::new(DispatcherConfig::from_rpm(6000.0).unwrap());
    let mut outcomes = dispatcher.dispatch(batches, "cl_test", Arc::new(client));

    let outcome = outcomes.recv().await.expect("one outcome");
    match outcome.result {
        Err(Error::Remote {
            status,
            message,
            retryable,
        }) => {
            assert_eq!(status, 429);
            assert!(message.contains("throttled"));
            assert!(retryable);
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    assert!(outcomes.recv().await.is_none());
}

/// A malformed payload fails only its own batch; the run completes and the
/// process survives.
#[tokio::test]
async fn test_bad_payload_is_recoverable_per_batch() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v3/classifiers/cl_test/classify/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{not json")
        .create_async()
        .await;

    let client = ClassifyClientBuilder::new()
        .token("test-token")
        .base_url_override(server.url())
        .build()
        .unwrap();

    let batches = batch::split(vec!["aabb".to_string(), "bbaa".to_string()], 2).unwrap();
    let dispatcher = Dispatcher::new(DispatcherConfig::from_rpm(6000.0).unwrap());
    let mut outcomes = dispatcher.dispatch(batches, "cl_test", Arc::new(client));

    let outcome = outcomes.recv().await.expect("one outcome");
    assert!(!outcome.is_success());
    assert_eq!(outcome.batch, 0);
    assert_eq!(outcome.documents, 2);
    assert!(outcomes.recv().await.is_none());
}

#[tokio::test]
async fn test_build_without_token_is_a_configuration_error() {
    // No explicit token, no keyring entry, no env fallback in the test
    // environment: building the client must fail before any request.
    if std::env::var("DOCCLASSIFY_API_TOKEN").is_ok() {
        return;
    }
    let err = ClassifyClientBuilder::new()
        .base_url_override("http://localhost:9")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
