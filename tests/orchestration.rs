//! End-to-end coordinator scenarios against a mocked endpoint client

use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;
use veracity::{
    Action, BackoffPolicy, Coordinator, Error, GenerateClient, GenerateRequest, Payload, Result,
};

mock! {
    Client {}

    #[async_trait]
    impl GenerateClient for Client {
        async fn generate(&self, request: GenerateRequest) -> Result<String>;
    }
}

fn envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test(start_paused = true)]
async fn analyze_success_lands_structured_result() {
    let mut client = MockClient::new();
    client
        .expect_generate()
        .times(1)
        .withf(|request| {
            request.contents[0].parts[0]
                .text
                .contains("Chocolate extends lifespan by 10 years")
        })
        .returning(|_| {
            Ok(envelope(
                r#"{"credibilityScore": 15, "breakdown": "No longitudinal study supports this claim."}"#,
            ))
        });

    let coordinator = Coordinator::new(Action::Analyze, Arc::new(client), BackoffPolicy::default());
    assert!(coordinator.invoke("Chocolate extends lifespan by 10 years").await);

    let state = coordinator.state();
    assert!(!state.busy);
    assert!(state.error.is_none());
    match state.result {
        Some(Payload::Analysis(analysis)) => {
            assert_eq!(analysis.credibility_score, 15.0);
            assert_eq!(
                analysis.breakdown,
                "No longitudinal study supports this claim."
            );
        }
        other => panic!("expected analysis result, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn fact_exhausts_retries_on_server_errors() {
    let mut client = MockClient::new();
    client
        .expect_generate()
        .times(4)
        .returning(|_| Err(Error::HttpStatus(500)));

    let coordinator = Coordinator::new(Action::Fact, Arc::new(client), BackoffPolicy::default());

    let started = tokio::time::Instant::now();
    assert!(coordinator.invoke("").await);

    let state = coordinator.state();
    assert!(!state.busy);
    assert!(state.result.is_none());
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to get a fact. Please try again.")
    );
    // Three backoff waits: 2s + 4s + 8s
    assert_eq!(started.elapsed(), std::time::Duration::from_secs(14));
}

#[tokio::test(start_paused = true)]
async fn summarize_validation_skips_network_entirely() {
    // Any call would trip the mock: no expectations are set
    let client = MockClient::new();
    let coordinator =
        Coordinator::new(Action::Summarize, Arc::new(client), BackoffPolicy::default());

    assert!(coordinator.invoke("   \t  ").await);

    let state = coordinator.state();
    assert!(!state.busy);
    assert!(state.result.is_none());
    assert_eq!(
        state.error.as_deref(),
        Some("Please enter some text to summarize.")
    );
}

#[tokio::test(start_paused = true)]
async fn coordinator_is_reusable_after_failure() {
    let mut seq = mockall::Sequence::new();
    let mut client = MockClient::new();
    client
        .expect_generate()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(envelope("first summary")));
    client
        .expect_generate()
        .times(4)
        .in_sequence(&mut seq)
        .returning(|_| Err(Error::Network("dns failure".to_string())));
    client
        .expect_generate()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(envelope("second summary")));

    let coordinator =
        Coordinator::new(Action::Summarize, Arc::new(client), BackoffPolicy::default());

    coordinator.invoke("article one").await;
    assert_eq!(
        coordinator.state().result,
        Some(Payload::Text("first summary".to_string()))
    );

    coordinator.invoke("article two").await;
    let failed = coordinator.state();
    assert!(failed.result.is_none());
    assert_eq!(
        failed.error.as_deref(),
        Some("Failed to get a summary. Please try again.")
    );

    coordinator.invoke("article three").await;
    let recovered = coordinator.state();
    assert_eq!(
        recovered.result,
        Some(Payload::Text("second summary".to_string()))
    );
    assert!(recovered.error.is_none());
}
