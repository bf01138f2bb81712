use std::io::Write;

use mockito::Matcher;
use serde_json::json;
use vitae_llm::{
    ChatClient, ChatOptions, ChatRequest, ClientFactory, EndpointConfig, HttpClientFactory,
    LlmError, Message, OpenAICompatClient, ThinkingMode,
};

fn endpoint(server: &mockito::ServerGuard) -> EndpointConfig {
    EndpointConfig::new(format!("{}/api/paas/v4/chat/completions", server.url()), "test-key")
}

fn request() -> ChatRequest {
    ChatRequest::new(
        "glm-4.7",
        vec![Message::system("be brief"), Message::human("Hi")],
    )
    .with_options(
        ChatOptions::new()
            .max_tokens(65536)
            .temperature(1.0)
            .thinking(ThinkingMode::Enabled),
    )
}

#[tokio::test]
async fn test_chat_posts_bearer_auth_and_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/paas/v4/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "glm-4.7",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "Hi"}
            ],
            "max_tokens": 65536,
            "thinking": {"type": "enabled"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":" X "}}]}"#)
        .create_async()
        .await;

    let client = OpenAICompatClient::new(&endpoint(&server)).unwrap();
    let response = client.chat(request()).await.unwrap();

    assert_eq!(response.content, "X");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_choices_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/paas/v4/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = OpenAICompatClient::new(&endpoint(&server)).unwrap();
    let err = client.chat(request()).await.unwrap_err();

    match err {
        LlmError::MalformedResponse { raw } => assert_eq!(raw, r#"{"choices":[]}"#),
        other => panic!("expected MalformedResponse, got {other}"),
    }
}

#[tokio::test]
async fn test_error_envelope_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/paas/v4/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"bad key"}}"#)
        .create_async()
        .await;

    let client = OpenAICompatClient::new(&endpoint(&server)).unwrap();
    let err = client.chat(request()).await.unwrap_err();

    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "bad key");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_uses_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/paas/v4/chat/completions")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let client = OpenAICompatClient::new(&endpoint(&server)).unwrap();
    let err = client.chat(request()).await.unwrap_err();

    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "HTTP 503");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn test_error_body_cut_off_still_reports_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/paas/v4/chat/completions")
        .with_status(502)
        .with_chunked_body(|w| {
            w.write_all(br#"{"error":{"mess"#)?;
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "upstream dropped",
            ))
        })
        .create_async()
        .await;

    let client = OpenAICompatClient::new(&endpoint(&server)).unwrap();
    let err = client.chat(request()).await.unwrap_err();

    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "HTTP 502");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn test_scalar_choice_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/paas/v4/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":["x"]}"#)
        .create_async()
        .await;

    let client = OpenAICompatClient::new(&endpoint(&server)).unwrap();
    let err = client.chat(request()).await.unwrap_err();

    assert!(matches!(err, LlmError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_factory_client_reaches_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/paas/v4/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"delta":{"content":"partial"}}]}"#)
        .create_async()
        .await;

    let client = HttpClientFactory::new()
        .create_chat_client(&endpoint(&server))
        .unwrap();
    let response = client.chat(request()).await.unwrap();

    assert_eq!(response.content, "partial");
    mock.assert_async().await;
}
