use pettiness_meter::{
    analysis,
    completion::{Completion, CompletionError, MessagesClient},
    config::ApiConfig,
};

fn api_for(server: &mockito::Server) -> ApiConfig {
    ApiConfig {
        endpoint: format!("{}/v1/messages", server.url()),
        model: "test-model".into(),
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

#[test]
fn joins_text_blocks_from_messages_response() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "test-model",
            "max_tokens": 1024
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"content":[
                {"type":"text","text":"{\"score\":75,\"category\":\"Pretty petty\","},
                {"type":"text","text":"\"judgment\":\"j\",\"advice\":\"a\"}"}
            ]}"#,
        )
        .create();

    let client = MessagesClient::with_api_key(&api_for(&server), Some("test-key".into())).unwrap();
    let result = analysis::analyze(&client, "They took my parking spot", "en-US").unwrap();
    mock.assert();
    assert_eq!(result.score, 75);
    assert_eq!(result.category, "Pretty petty");
}

#[test]
fn non_success_status_is_an_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(529)
        .with_body("overloaded")
        .create();

    let client = MessagesClient::with_api_key(&api_for(&server), Some("k".into())).unwrap();
    match client.complete("hello") {
        Err(CompletionError::Status { status, body }) => {
            assert_eq!(status, 529);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn response_without_text_is_empty() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":[]}"#)
        .create();

    let client = MessagesClient::with_api_key(&api_for(&server), Some("k".into())).unwrap();
    assert!(matches!(
        client.complete("hello"),
        Err(CompletionError::EmptyResponse)
    ));
}
