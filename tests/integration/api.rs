//! Endpoint groups: paths, verbs and payload shapes.

use crate::mock_server::{envelope, silent_server, MockServerFixture};
use knowbase_client::theme::{BackgroundKind, BackgroundStyle, BackgroundUpdate};
use knowbase_client::{
    ClientConfig, Error, ErrorKind, KnowbaseClient, MemoryStore, RecordingHost, TransportError,
};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn category_update_puts_to_the_id_path() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("PUT", "/api/categories/7")
        .match_body(Matcher::Json(json!({"name": "systems"})))
        .with_body(envelope(0, "", json!({"id": 7, "name": "systems"})))
        .create_async()
        .await;

    let data = fixture
        .client
        .categories()
        .update(7, json!({"name": "systems"}))
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(data["name"], "systems");
}

#[tokio::test]
async fn ai_usage_passes_days_in_the_query() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/api/user/ai-usage")
        .match_query(Matcher::UrlEncoded("days".into(), "30".into()))
        .with_body(envelope(200, "", json!({"total_tokens": 1200})))
        .create_async()
        .await;

    let data = fixture.client.user().ai_usage(30).await.unwrap();
    mock.assert_async().await;
    assert_eq!(data, json!({"total_tokens": 1200}));
}

#[tokio::test]
async fn chat_message_file_defaults_to_image() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("PUT", "/api/chat/messages/11/file")
        .match_body(Matcher::Json(json!({
            "fileUrl": "https://cdn.example/a.png",
            "fileType": "image"
        })))
        .with_body(envelope(0, "", json!(null)))
        .create_async()
        .await;

    fixture
        .client
        .chat()
        .update_message_file(11, "https://cdn.example/a.png", None)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_messages_sends_paging_as_query() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/api/chat/conversations/4/messages")
        .match_query(Matcher::UrlEncoded("limit".into(), "20".into()))
        .with_body(envelope(0, "", json!([])))
        .create_async()
        .await;

    fixture
        .client
        .chat()
        .messages(4, Some(json!({"limit": 20})))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn base64_upload_goes_through_the_dispatcher() {
    let mut fixture = MockServerFixture::new().await;
    fixture.sign_in("tok");
    let mock = fixture
        .server
        .mock("POST", "/api/upload/to-cos")
        .match_header("authorization", "Bearer tok")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "file_data": "aGVsbG8=",
            "filename": "hello.txt",
            "file_type": "text/plain",
            "description": ""
        })))
        .with_body(envelope(200, "ok", json!({"url": "https://cdn.example/hello.txt"})))
        .create_async()
        .await;

    let env = fixture
        .client
        .uploads()
        .upload_file_to_cos(b"hello", "hello.txt", "text/plain", None)
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(env.data["url"], "https://cdn.example/hello.txt");
}

#[tokio::test]
async fn base64_upload_401_tears_the_session_down() {
    let mut fixture = MockServerFixture::new().await;
    fixture.sign_in("tok");
    let _mock = fixture
        .server
        .mock("POST", "/api/upload/to-cos")
        .with_status(401)
        .create_async()
        .await;

    let err = fixture
        .client
        .uploads()
        .upload_file_to_cos(b"x", "x.bin", "application/octet-stream", Some("d"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthExpired);
    assert!(fixture.token().is_none());
}

#[tokio::test]
async fn monitor_clear_posts_an_empty_object() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/api/monitor/messages/clear")
        .match_body(Matcher::Json(json!({})))
        .with_body(envelope(0, "", json!(null)))
        .create_async()
        .await;

    fixture.client.monitor().clear_messages().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn background_preference_lives_in_the_client_store() {
    let fixture = MockServerFixture::new().await;
    let settings = fixture.client.background();
    assert_eq!(
        settings.style(),
        BackgroundStyle::Plain {
            background: "#ffffff".into()
        }
    );

    let saved = settings
        .set(BackgroundUpdate {
            kind: None,
            value: Some("https://cdn.example/bg.jpg".into()),
        })
        .unwrap();
    assert_eq!(saved.kind, BackgroundKind::Image);

    // A second handle reads the same store.
    match fixture.client.background().style() {
        BackgroundStyle::Image { image, .. } => assert_eq!(image, "url(https://cdn.example/bg.jpg)"),
        other => panic!("unexpected style: {other:?}"),
    }
}

#[tokio::test]
async fn chat_send_message_runs_on_the_long_deadline() {
    let (base_url, server) = silent_server().await;
    let mut config = ClientConfig::for_base_url(&base_url);
    config.request_timeout = Duration::from_millis(100);
    config.long_request_timeout = Duration::from_millis(400);
    let client = KnowbaseClient::builder()
        .config(config)
        .store(Arc::new(MemoryStore::new()))
        .host(Arc::new(RecordingHost::default()))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client
        .chat()
        .send_message(json!({"conversation_id": 1, "content": "summarise https://example.com"}))
        .await
        .unwrap_err();
    match err {
        Error::Transport(TransportError::Timeout(d)) => assert_eq!(d, Duration::from_millis(400)),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(started.elapsed() >= Duration::from_millis(400));

    // Ordinary calls keep the short deadline.
    let err = client.chat().conversations().await.unwrap_err();
    match err {
        Error::Transport(TransportError::Timeout(d)) => assert_eq!(d, Duration::from_millis(100)),
        other => panic!("expected timeout, got {other:?}"),
    }
    server.abort();
}

#[tokio::test]
async fn ai_chat_fills_model_defaults_from_config() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/api/ai/chat")
        .match_body(Matcher::Json(json!({
            "message": "what did I save about tokio?",
            "model": "deepseek-chat",
            "max_tokens": 512,
            "temperature": 0.7
        })))
        .with_body(envelope(0, "", json!({"reply": "..."})))
        .create_async()
        .await;

    let data = fixture
        .client
        .ai()
        .chat(json!({"message": "what did I save about tokio?", "max_tokens": 512}))
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(data, json!({"reply": "..."}));
}
