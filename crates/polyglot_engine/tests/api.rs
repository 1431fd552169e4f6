use std::time::Duration;

use polyglot_engine::{
    ApiFailure, ApiSettings, ChapterPayload, HttpTranslationApi, RemoteStatus, TranslationApi,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ApiSettings {
    ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    }
}

#[tokio::test]
async fn start_job_posts_session_and_language_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_json(serde_json::json!({
            "session_id": "session-1",
            "target_language": "fr",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job_id": "job-1",
        })))
        .mount(&server)
        .await;

    let api = HttpTranslationApi::new(settings_for(&server)).unwrap();
    let job_id = api.start_job("session-1", "fr").await.expect("start ok");
    assert_eq!(job_id, "job-1");
}

#[tokio::test]
async fn start_job_surfaces_the_service_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Document not found",
        })))
        .mount(&server)
        .await;

    let api = HttpTranslationApi::new(settings_for(&server)).unwrap();
    let err = api.start_job("session-9", "fr").await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::HttpStatus(404));
    assert_eq!(err.message, "Document not found");
}

#[tokio::test]
async fn poll_job_parses_a_full_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "in_progress",
            "translated_chapters": [
                { "id": "c1", "content": "Bonjour" },
            ],
            "completed": 1,
            "total": 2,
        })))
        .mount(&server)
        .await;

    let api = HttpTranslationApi::new(settings_for(&server)).unwrap();
    let snapshot = api.poll_job("job-1").await.expect("poll ok");
    assert_eq!(snapshot.status, RemoteStatus::InProgress);
    assert_eq!(
        snapshot.translated_chapters,
        vec![ChapterPayload {
            id: "c1".to_string(),
            content: "Bonjour".to_string(),
        }]
    );
    assert_eq!(snapshot.completed, Some(1));
    assert_eq!(snapshot.total, Some(2));
}

#[tokio::test]
async fn poll_job_tolerates_missing_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "queued",
        })))
        .mount(&server)
        .await;

    let api = HttpTranslationApi::new(settings_for(&server)).unwrap();
    let snapshot = api.poll_job("job-1").await.expect("poll ok");
    assert_eq!(snapshot.status, RemoteStatus::Queued);
    assert!(snapshot.translated_chapters.is_empty());
    assert_eq!(snapshot.completed, None);
}

#[tokio::test]
async fn poll_job_flags_a_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = HttpTranslationApi::new(settings_for(&server)).unwrap();
    let err = api.poll_job("job-1").await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::Malformed);
}

#[tokio::test]
async fn poll_job_times_out_on_a_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "status": "queued" })),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    };
    let api = HttpTranslationApi::new(settings).unwrap();
    let err = api.poll_job("job-1").await.unwrap_err();
    assert_eq!(err.kind, ApiFailure::Timeout);
}
