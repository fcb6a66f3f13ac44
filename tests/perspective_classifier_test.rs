//! Comment analyzer classifier against a mock HTTP server.

mod support;

use std::collections::BTreeSet;
use std::time::Duration;

use modguard::prelude::*;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn classifier(server: &MockServer, retry: Option<RetryPolicy>) -> PerspectiveClassifier {
    let mut builder = PerspectiveConfig::builder("test-key")
        .base_url(server.uri())
        .timeout(Duration::from_secs(5));
    if let Some(policy) = retry {
        builder = builder.retry_policy(policy);
    }
    PerspectiveClassifier::new(builder.build().expect("config")).expect("client")
}

fn requested() -> BTreeSet<Category> {
    [Category::Toxicity, Category::Threat].into_iter().collect()
}

#[tokio::test]
async fn analyze_sends_requested_attributes_and_reads_summary_scores() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "comment": {"text": "you are awful"},
        "requestedAttributes": {"TOXICITY": {}, "THREAT": {}},
        "languages": ["en"]
    });
    let resp = serde_json::json!({
        "attributeScores": {
            "TOXICITY": {
                "spanScores": [{"begin": 0, "end": 13, "score": {"value": 0.81, "type": "PROBABILITY"}}],
                "summaryScore": {"value": 0.8123, "type": "PROBABILITY"}
            },
            "THREAT": {"summaryScore": {"value": 0.05, "type": "PROBABILITY"}}
        },
        "languages": ["en"],
        "detectedLanguages": ["en"]
    });

    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .and(query_param("key", "test-key"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(resp))
        .expect(1)
        .mount(&server)
        .await;

    let scores = classifier(&server, None)
        .analyze("you are awful", &requested())
        .await
        .expect("scores");

    assert_eq!(scores.len(), 2);
    assert_eq!(scores[&Category::Toxicity], 0.8123);
    assert_eq!(scores[&Category::Threat], 0.05);
}

#[tokio::test]
async fn bad_request_is_a_non_retryable_classifier_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .respond_with(ResponseTemplate::new(400).set_body_string("language not supported"))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::new()
        .with_initial_delay(Duration::from_millis(1))
        .with_jitter(false);
    let err = classifier(&server, Some(policy))
        .analyze("hola", &requested())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    assert!(matches!(err, ModerationError::ClassifierError { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn quota_errors_are_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = classifier(&server, None)
        .analyze("text", &requested())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(429));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn server_error_is_retried_when_policy_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "attributeScores": {"TOXICITY": {"summaryScore": {"value": 0.4}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::new()
        .with_max_attempts(3)
        .with_initial_delay(Duration::from_millis(1))
        .with_jitter(false);
    let scores = classifier(&server, Some(policy))
        .analyze("text", &requested())
        .await
        .expect("scores after retry");

    assert_eq!(scores[&Category::Toxicity], 0.4);
}

#[tokio::test]
async fn malformed_body_is_a_classifier_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = classifier(&server, None)
        .analyze("text", &requested())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ModerationError::ClassifierError { status: None, .. }
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_retryable_classifier_error() {
    // Bind and release a port so nothing is listening on it.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = PerspectiveConfig::builder("test-key")
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let classifier = PerspectiveClassifier::new(config).unwrap();

    let err = classifier.analyze("text", &requested()).await.unwrap_err();

    assert!(matches!(
        err,
        ModerationError::ClassifierError {
            status: None,
            transient: true,
            ..
        }
    ));
    assert!(err.is_retryable());
    assert!(err.aborts_pipeline());
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn classifier_plugs_into_the_pipeline() {
    use std::sync::Arc;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "attributeScores": {
                "TOXICITY": {"summaryScore": {"value": 0.2}},
                "INSULT": {"summaryScore": {"value": 0.1}}
            }
        })))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryStore::new());
    let platform = support::RecordingPlatform::new();
    let coordinator = ModerationCoordinator::builder()
        .classifier(Arc::new(classifier(&server, None)))
        .platform(platform.clone())
        .settings(store.clone())
        .offenses(store)
        .build()
        .expect("coordinator");

    // Five baseline filters put NOTIFY at 1.5; 0.3 is well below it.
    let outcome = coordinator
        .process(&support::message(1, 42, "mildly rude"))
        .await;

    assert!(matches!(
        outcome,
        ModerationOutcome::Aborted {
            reason: AbortReason::BelowNotify { .. },
            ..
        }
    ));
    assert!(platform.sent().is_empty());
}
