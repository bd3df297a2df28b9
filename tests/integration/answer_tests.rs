//! Integration tests for answering against a mock Messages API

use crate::common::test_config;
use chrono::Utc;
use hermes::answer::{AnswerError, Answerer, AnsweringModel, AnthropicModel};
use hermes::document::Document;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn document(url: &str, title: &str, content: &str) -> Document {
    Document {
        url: url.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        description: String::new(),
        domain: "docs.example.com".to_string(),
        fetched_at: Utc::now(),
    }
}

fn model_for(server: &MockServer) -> AnthropicModel {
    let config = test_config(10, &format!("{}/v1/messages", server.uri()));
    AnthropicModel::new(reqwest::Client::new(), &config.answering, "secret-key")
}

#[tokio::test]
async fn test_model_sends_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "secret-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 256,
            "messages": [{ "role": "user", "content": "Say hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "thinking", "thinking": "..." },
                { "type": "text", "text": "Hello there" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = model_for(&server).complete("Say hello").await.unwrap();
    assert_eq!(reply, "Hello there");
}

#[tokio::test]
async fn test_upstream_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = model_for(&server).complete("Anything").await.unwrap_err();
    match &err {
        AnswerError::Upstream { status, body } => {
            assert_eq!(*status, 529);
            assert_eq!(body, "overloaded");
        }
        other => panic!("Expected Upstream error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "Claude API error: 529 - overloaded");
}

#[tokio::test]
async fn test_response_without_text_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let err = model_for(&server).complete("Anything").await.unwrap_err();
    assert!(matches!(err, AnswerError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_answer_cites_retrieved_documents() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "Deploy with the deploy command." }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let documents = vec![
        document(
            "https://docs.example.com/deploy",
            "Deployment guide",
            "Run the deployment command to ship a release.",
        ),
        document(
            "https://docs.example.com/billing",
            "Billing",
            "Invoices are sent monthly.",
        ),
    ];

    let config = test_config(10, &format!("{}/v1/messages", server.uri()));
    let answerer = Answerer::from_config(model_for(&server), &config.retrieval);

    let answer = answerer
        .ask("how does deployment work", &documents, None)
        .await
        .unwrap();

    assert_eq!(answer.answer, "Deploy with the deploy command.");
    assert_eq!(answer.context_used, 1);
    assert_eq!(answer.sources[0].url, "https://docs.example.com/deploy");
}

#[tokio::test]
async fn test_model_not_called_without_documents() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(10, &format!("{}/v1/messages", server.uri()));
    let answerer = Answerer::from_config(model_for(&server), &config.retrieval);

    let err = answerer.ask("anything at all", &[], None).await.unwrap_err();
    assert!(matches!(err, AnswerError::Retrieval(_)));
}
