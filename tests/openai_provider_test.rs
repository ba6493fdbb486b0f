// Integration tests for the OpenAI-compatible provider and a full run over HTTP
//
// A local mockito server stands in for the chat completions endpoint.

use std::sync::Arc;
use std::time::Duration;

use mockito::Matcher;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use copydesk::config::Config;
use copydesk::errors::{CompletionError, RefineError, Stage};
use copydesk::providers::{LlmProvider, Message, OpenAIProvider, ProviderRequest};
use copydesk::refinement::{
    MarkerSignal, RecordingTranscript, RefinementConfig, RefinementLoop, Termination,
};
use copydesk::roles::{build_roles, Role, RoleFunction, RoleSpec};

const PATH: &str = "/v1/chat/completions";

fn completion_body(text: Option<&str>) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn provider_for(server: &mockito::ServerGuard) -> OpenAIProvider {
    OpenAIProvider::new(
        "test-key".to_string(),
        server.url(),
        "gpt-4o-mini".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_send_message_posts_chat_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 256,
            "messages": [{ "role": "user", "content": "Hello" }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(Some("Hi there")))
        .create_async()
        .await;

    let provider = provider_for(&server);
    let request = ProviderRequest::new(vec![Message::user("Hello")]).with_max_tokens(256);
    let response = provider.send_message(&request).await.unwrap();

    assert_eq!(response.text, "Hi there");
    assert_eq!(response.provider, "openai");
    assert_eq!(response.stop_reason.as_deref(), Some("stop"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_surfaces_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("upstream overloaded")
        .expect(1)
        .create_async()
        .await;

    let provider = provider_for(&server);
    let err = provider
        .send_message(&ProviderRequest::new(vec![Message::user("x")]))
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("503"), "{message}");
    assert!(message.contains("upstream overloaded"), "{message}");
    // The provider itself never retries
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"unexpected\": true}")
        .create_async()
        .await;

    let provider = provider_for(&server);
    let err = provider
        .send_message(&ProviderRequest::new(vec![Message::user("x")]))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse OpenAI API response"));
}

#[tokio::test]
async fn test_null_content_is_empty_completion_for_role() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(None))
        .create_async()
        .await;

    let role = RoleFunction::new(RoleSpec::reporter(), Arc::new(provider_for(&server)));
    let err = role.run("topic").await.unwrap_err();
    assert!(matches!(err, CompletionError::Empty { ref role } if role == "reporter"));
}

#[tokio::test]
async fn test_full_run_over_http() {
    let mut server = mockito::Server::new_async().await;

    let reporter = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex("writes news articles".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(Some("Remote work is here to stay.")))
        .expect(1)
        .create_async()
        .await;

    let editor = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("rewrites and refines".to_string()),
            Matcher::Regex("Remote work is here to stay.".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(Some("Remote work is here to stay, for now.\n\nTERMINATE")))
        .expect(1)
        .create_async()
        .await;

    let mut config = Config::new("test-key");
    config.provider.base_url = server.url();
    let provider: Arc<dyn LlmProvider> =
        Arc::new(OpenAIProvider::from_settings(config.api_key.clone(), &config.provider).unwrap());
    let roles = build_roles(&config, provider).unwrap();
    let runner = RefinementLoop::new(
        Arc::new(roles.generator),
        Arc::new(roles.reviewer),
        Arc::new(MarkerSignal::new(config.refinement.termination_marker.clone())),
        RefinementConfig::from_config(&config),
    );

    let outcome = runner
        .run(
            "Is remote work the future?",
            &mut RecordingTranscript::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.termination, Termination::Marker { iteration: 1 });
    assert_eq!(outcome.final_draft, "Remote work is here to stay, for now.\n\nTERMINATE");
    reporter.assert_async().await;
    editor.assert_async().await;
}

#[tokio::test]
async fn test_http_failure_aborts_run_with_stage() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", PATH)
        .match_body(Matcher::Regex("writes news articles".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(Some("Seed article.")))
        .create_async()
        .await;

    let editor = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex("rewrites and refines".to_string()))
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;

    let mut config = Config::new("test-key");
    config.provider.base_url = server.url();
    let provider: Arc<dyn LlmProvider> =
        Arc::new(OpenAIProvider::from_settings(config.api_key.clone(), &config.provider).unwrap());
    let roles = build_roles(&config, provider).unwrap();
    let runner = RefinementLoop::new(
        Arc::new(roles.generator),
        Arc::new(roles.reviewer),
        Arc::new(MarkerSignal::new("TERMINATE")),
        RefinementConfig::from_config(&config),
    );

    let err = runner
        .run("topic", &mut RecordingTranscript::new(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RefineError::Completion {
            stage: Stage::Review { iteration: 1 },
            ..
        }
    ));
    assert_eq!(err.last_draft(), Some("Seed article."));
    editor.assert_async().await;
}
