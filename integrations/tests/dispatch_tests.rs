//! Prompt dispatch, HTTP and FTP integration tests

mod common;

use integrations::{IntegrationError, IntegrationRegistry, Parameters, PromptProcessor, PromptRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn processor(base_url: &str) -> (PromptProcessor, std::sync::Arc<integrations::ftp::InMemoryFtp>) {
    let (ctx, ftp) = common::context(base_url);
    (PromptProcessor::new(IntegrationRegistry::with_builtin(ctx)), ftp)
}

#[test]
fn test_builtin_registry_names() {
    let (processor, _) = processor("http://127.0.0.1:9");

    assert_eq!(
        processor.registry().names(),
        vec!["elevenlabs", "face-swap", "ftp", "http", "mvsep", "openai-image", "suno"]
    );
}

#[tokio::test]
async fn test_unknown_engine_is_rejected() {
    let (processor, _) = processor("http://127.0.0.1:9");

    let result = processor
        .process_prompt("hello", "midjourney", "", &Parameters::new())
        .await;

    match result {
        Err(IntegrationError::UnsupportedEngine(engine)) => assert_eq!(engine, "midjourney"),
        other => panic!("expected UnsupportedEngine, got {:?}", other),
    }
}

#[tokio::test]
async fn test_every_integration_answers_under_the_requested_key() {
    let (processor, ftp) = processor("http://127.0.0.1:9");

    for engine in processor.registry().names() {
        let params = Parameters::new().with("responseKey", "result");
        let envelope = processor
            .process_prompt("", &engine, "", &params)
            .await
            .unwrap();

        let value = envelope.to_value();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1, "engine {}", engine);
        assert_eq!(object["result"]["success"], false, "engine {}", engine);
        assert!(
            object["result"]["error"]
                .as_str()
                .unwrap()
                .starts_with("Missing required parameter"),
            "engine {} returned {}",
            engine,
            value
        );
    }

    assert!(ftp.is_empty());
}

#[tokio::test]
async fn test_process_request_from_json() {
    let (processor, ftp) = processor("http://127.0.0.1:9");

    let request: PromptRequest = serde_json::from_value(json!({
        "prompt": "hello ftp",
        "engine": "ftp",
        "parameters": { "folder": "notes", "extension": "md" }
    }))
    .unwrap();

    let envelope = processor.process_request(&request).await.unwrap();
    let value = envelope.to_value();

    assert_eq!(value["ftpUpload"]["success"], true);
    let data = &value["ftpUpload"]["data"];
    assert_eq!(data["success"], true);
    let access_url = data["accessUrl"].as_str().unwrap();
    let file_name = data["fileName"].as_str().unwrap();
    assert_eq!(access_url, format!("https://cdn.test/notes/{}", file_name));
    assert!(file_name.ends_with(".md"));

    let stored = ftp.find(file_name).unwrap();
    assert_eq!(stored.remote_dir, "/www/notes");
    assert_eq!(stored.data, b"hello ftp");
}

#[tokio::test]
async fn test_ftp_integration_content_types() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/remote/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .mount(&mock_server)
        .await;

    let (processor, ftp) = processor(&mock_server.uri());

    let params = Parameters::new()
        .with("content", "aGVsbG8=")
        .with("content_type", "base64")
        .with("extension", ".bin");
    let envelope = processor.process_prompt("", "ftp", "", &params).await.unwrap();
    assert!(envelope.is_success());

    let params = Parameters::new()
        .with("content", format!("{}/remote/report.pdf", mock_server.uri()))
        .with("content_type", "url")
        .with("extension", "pdf");
    let envelope = processor.process_prompt("", "ftp", "", &params).await.unwrap();
    assert!(envelope.is_success());

    let params = Parameters::new().with("content_type", "zip");
    let envelope = processor.process_prompt("data", "ftp", "", &params).await.unwrap();
    assert!(!envelope.is_success());
    assert!(envelope.outcome().error.as_deref().unwrap().contains("content_type"));

    let data: Vec<Vec<u8>> = ftp.files().into_iter().map(|f| f.data).collect();
    assert_eq!(data, vec![b"hello".to_vec(), b"%PDF-1.7".to_vec()]);
}

#[tokio::test]
async fn test_http_integration_get_with_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city", "Paris"))
        .and(header("x-token", "abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "r-1")
                .set_body_json(json!({ "temp": 21 })),
        )
        .mount(&mock_server)
        .await;

    let (processor, _) = processor(&mock_server.uri());

    let params = Parameters::new()
        .with("url", format!("{}/weather", mock_server.uri()))
        .with("query", json!({ "city": "Paris" }))
        .with("headers", json!({ "x-token": "abc" }));
    let envelope = processor.process_prompt("", "http", "", &params).await.unwrap();
    let value = envelope.to_value();

    let data = &value["httpResponse"]["data"];
    assert_eq!(data["status"], 200);
    assert_eq!(data["body"]["temp"], 21);
    assert_eq!(data["headers"]["x-request-id"], "r-1");
}

#[tokio::test]
async fn test_http_integration_post_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_json(json!({ "name": "lamp" })))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&mock_server)
        .await;

    let (processor, _) = processor(&mock_server.uri());

    let params = Parameters::new()
        .with("method", "post")
        .with("body", json!({ "name": "lamp" }))
        .with("responseKey", "created");
    let url = format!("{}/items", mock_server.uri());
    let envelope = processor.process_prompt(&url, "http", "", &params).await.unwrap();

    assert_eq!(
        envelope.to_value(),
        json!({
            "created": {
                "success": true,
                "data": {
                    "status": 201,
                    "headers": envelope.outcome().data.as_ref().unwrap()["headers"].clone(),
                    "body": "created"
                }
            }
        })
    );
}

#[tokio::test]
async fn test_http_integration_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&mock_server)
        .await;

    let (processor, _) = processor(&mock_server.uri());

    let envelope = processor
        .process_prompt(&mock_server.uri(), "http", "", &Parameters::new())
        .await
        .unwrap();

    let outcome = envelope.outcome();
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("API request failed (500): boom"));
    assert_eq!(outcome.details, Some(json!({ "error": "boom" })));
}

#[tokio::test]
async fn test_http_integration_rejects_other_schemes() {
    let (processor, _) = processor("http://127.0.0.1:9");

    let params = Parameters::new().with("url", "file:///etc/passwd");
    let envelope = processor.process_prompt("", "http", "", &params).await.unwrap();

    assert!(!envelope.is_success());
    assert!(envelope.outcome().error.as_deref().unwrap().contains("url"));
}

#[tokio::test]
async fn test_http_integration_accepts_uppercase_scheme() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("up"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (processor, _) = processor(&mock_server.uri());

    let url = format!("{}/status", mock_server.uri()).replacen("http://", "HTTP://", 1);
    let params = Parameters::new().with("url", url);
    let envelope = processor.process_prompt("", "http", "", &params).await.unwrap();

    assert!(envelope.is_success(), "{}", envelope.to_value());
    assert_eq!(envelope.outcome().data.as_ref().unwrap()["body"], "up");
}
