//! Long-running job integration tests (Suno, MVSEP)

mod common;

use integrations::adapters::{MvsepIntegration, SunoIntegration};
use integrations::{Integration, Parameters, PollConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_poll(max_attempts: u32) -> PollConfig {
    PollConfig::new(Duration::from_millis(5), max_attempts)
}

#[tokio::test]
async fn test_suno_polls_until_complete() {
    let mock_server = MockServer::start().await;
    let audio_url = format!("{}/files/c1.mp3", mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "c1", "status": "submitted" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/get"))
        .and(query_param("ids", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "c1", "status": "streaming" }
        ])))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/get"))
        .and(query_param("ids", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "c1", "status": "complete", "title": "Ocean", "audio_url": audio_url }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/c1.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-data".to_vec()))
        .mount(&mock_server)
        .await;

    let (ctx, ftp) = common::context(&mock_server.uri());
    let integration = SunoIntegration::new(ctx).with_poll_config(quick_poll(30));

    let envelope = integration.process("calm ocean waves", "", &Parameters::new()).await;
    let value = envelope.to_value();

    assert_eq!(value["music"]["success"], true);
    let clips = value["music"]["data"]["clips"].as_array().unwrap();
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0]["id"], "c1");
    assert_eq!(clips[0]["title"], "Ocean");
    assert!(clips[0]["url"].as_str().unwrap().starts_with("https://cdn.test/music/"));

    let stored = ftp.files();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].data, b"mp3-data");
}

#[tokio::test]
async fn test_suno_custom_mode_with_tags() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/custom_generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "x1", "status": "error" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "x1", "status": "error", "error_message": "content policy" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (ctx, ftp) = common::context(&mock_server.uri());
    let integration = SunoIntegration::new(ctx).with_poll_config(quick_poll(30));

    let params = Parameters::new().with("tags", "jazz").with("title", "Night");
    let envelope = integration.process("[Verse] la la", "", &params).await;

    let outcome = envelope.outcome();
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Job x1 failed"));
    assert_eq!(
        outcome.details.as_ref().unwrap()["payload"][0]["error_message"],
        "content policy"
    );
    assert!(ftp.is_empty());
}

#[tokio::test]
async fn test_suno_times_out_when_job_never_finishes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "slow" }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "slow", "status": "queued" }
        ])))
        .expect(4)
        .mount(&mock_server)
        .await;

    let (ctx, _) = common::context(&mock_server.uri());
    let integration = SunoIntegration::new(ctx).with_poll_config(quick_poll(4));

    let envelope = integration.process("anything", "", &Parameters::new()).await;

    assert!(!envelope.is_success());
    let error = envelope.outcome().error.clone().unwrap();
    assert!(error.starts_with("Timeout:"), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_suno_status_errors_are_treated_as_pending() {
    let mock_server = MockServer::start().await;
    let audio_url = format!("{}/files/ok.mp3", mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "ok" }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "ok", "status": "complete", "audio_url": audio_url }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/ok.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&mock_server)
        .await;

    let (ctx, ftp) = common::context(&mock_server.uri());
    let integration = SunoIntegration::new(ctx).with_poll_config(quick_poll(5));

    let envelope = integration.process("song", "", &Parameters::new()).await;

    assert!(envelope.is_success());
    assert_eq!(ftp.len(), 1);
}

#[tokio::test]
async fn test_mvsep_separates_and_uploads_stems() {
    let mock_server = MockServer::start().await;
    let vocals = format!("{}/out/vocals.wav", mock_server.uri());
    let instrumental = format!("{}/out/instrumental.wav", mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/api/separation/create"))
        .and(body_string_contains("api_token=mvsep-key"))
        .and(body_string_contains("sep_type=40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "hash": "h-123", "link": "https://mvsep.com/result/h-123" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/separation/get"))
        .and(query_param("hash", "h-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "processing"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/separation/get"))
        .and(query_param("hash", "h-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "done",
            "data": {
                "files": [
                    { "type": "Vocals", "url": vocals },
                    { "type": "Instrumental", "url": instrumental }
                ]
            }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/out/vocals.wav"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"vocals".to_vec()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/out/instrumental.wav"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"inst".to_vec()))
        .mount(&mock_server)
        .await;

    let (ctx, ftp) = common::context(&mock_server.uri());
    let integration = MvsepIntegration::new(ctx).with_poll_config(quick_poll(10));

    let params = Parameters::new().with("audio_url", "https://music.test/song.mp3");
    let envelope = integration.process("", "", &params).await;
    let value = envelope.to_value();

    assert_eq!(value["separation"]["success"], true);
    assert_eq!(value["separation"]["data"]["hash"], "h-123");
    let files = value["separation"]["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["type"], "Vocals");
    assert!(files[0]["url"].as_str().unwrap().ends_with(".wav"));

    let stored = ftp.files();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|f| f.remote_dir == "/www/separations"));
}

#[tokio::test]
async fn test_mvsep_rejected_submission() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/separation/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": { "message": "Not enough credits" }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (ctx, _) = common::context(&mock_server.uri());
    let integration = MvsepIntegration::new(ctx).with_poll_config(quick_poll(3));

    let envelope = integration
        .process("https://music.test/song.mp3", "", &Parameters::new())
        .await;

    let outcome = envelope.outcome();
    assert!(!outcome.success);
    assert!(outcome.error.as_deref().unwrap().contains("Not enough credits"));
    assert_eq!(outcome.details.as_ref().unwrap()["success"], false);
}

#[tokio::test]
async fn test_mvsep_requires_audio() {
    let (ctx, _) = common::context("http://127.0.0.1:9");
    let integration = MvsepIntegration::new(ctx);

    let envelope = integration.process("", "", &Parameters::new()).await;

    assert_eq!(envelope.key(), "separation");
    assert_eq!(
        envelope.outcome().error.as_deref(),
        Some("Missing required parameter: audio_url")
    );
}
