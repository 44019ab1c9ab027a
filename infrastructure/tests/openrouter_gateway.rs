use std::time::Duration;

use council_application::{ModelQueryService, QueryError};
use council_domain::{Message, Model};
use council_infrastructure::{OpenRouterQueryService, OpenRouterSettings};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> OpenRouterQueryService {
    OpenRouterQueryService::new(
        OpenRouterSettings::new("sk-test")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_secs(5))
            .with_referer("https://council.test")
            .with_app_title("council-tests"),
    )
    .unwrap()
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

fn messages() -> Vec<Message> {
    vec![Message::system("Be brief."), Message::user("What is Rust?")]
}

#[tokio::test]
async fn openrouter_sends_auth_headers_and_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("HTTP-Referer", "https://council.test"))
        .and(header("X-Title", "council-tests"))
        .and(body_partial_json(json!({
            "model": "openai/gpt-5.1",
            "messages": [
                { "role": "system", "content": "Be brief." },
                { "role": "user", "content": "What is Rust?" }
            ]
        })))
        .respond_with(completion("A systems language."))
        .expect(1)
        .mount(&server)
        .await;

    let reply = service(&server)
        .query_one(&Model::new("openai/gpt-5.1"), &messages(), None)
        .await
        .unwrap();
    assert_eq!(reply, "A systems language.");
}

#[tokio::test]
async fn openrouter_maps_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "message": "Insufficient credits", "code": 402 }
        })))
        .mount(&server)
        .await;

    let err = service(&server)
        .query_one(&Model::new("openai/gpt-5.1"), &messages(), None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::Api {
            status: 402,
            message: "Insufficient credits".to_string()
        }
    );
}

#[tokio::test]
async fn openrouter_maps_error_inside_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "message": "Provider returned error", "code": 502 }
        })))
        .mount(&server)
        .await;

    let err = service(&server)
        .query_one(&Model::new("x-ai/grok-4"), &messages(), None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::Api {
            status: 502,
            message: "Provider returned error".to_string()
        }
    );
}

#[tokio::test]
async fn openrouter_rejects_empty_and_malformed_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "model": "empty/model" })))
        .respond_with(completion(""))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "model": "garbled/model" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let service = service(&server);
    let empty = service
        .query_one(&Model::new("empty/model"), &messages(), None)
        .await
        .unwrap_err();
    assert_eq!(empty, QueryError::EmptyResponse);

    let garbled = service
        .query_one(&Model::new("garbled/model"), &messages(), None)
        .await
        .unwrap_err();
    assert!(matches!(garbled, QueryError::InvalidResponse(_)));
}

#[tokio::test]
async fn openrouter_honours_per_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("too late").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = service(&server)
        .query_one(
            &Model::new("slow/model"),
            &messages(),
            Some(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
    assert_eq!(err, QueryError::Timeout);
}

#[tokio::test]
async fn openrouter_fan_out_keeps_panel_order_and_isolates_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "model": "a/first" })))
        .respond_with(completion("first answer").set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "model": "b/second" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "model": "c/third" })))
        .respond_with(completion("third answer"))
        .mount(&server)
        .await;

    let panel = vec![
        Model::new("a/first"),
        Model::new("b/second"),
        Model::new("c/third"),
    ];
    let outcomes = service(&server).query_many(&panel, &messages()).await;

    let order: Vec<&str> = outcomes.iter().map(|o| o.model.as_str()).collect();
    assert_eq!(order, vec!["a/first", "b/second", "c/third"]);
    assert_eq!(outcomes[0].result, Ok("first answer".to_string()));
    assert_eq!(
        outcomes[1].result,
        Err(QueryError::Api {
            status: 500,
            message: "upstream exploded".to_string()
        })
    );
    assert_eq!(outcomes[2].result, Ok("third answer".to_string()));
}
