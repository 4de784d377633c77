//! Dispatcher behaviour: auth header, classification, teardown, deadlines.

use crate::mock_server::{client_for, envelope, refused_address, silent_server, MockServerFixture};
use knowbase_client::auth::{LOGIN_ROUTE, REDIRECT_DELAY, SESSION_EXPIRED_NOTICE};
use knowbase_client::host::HostEvent;
use knowbase_client::{
    Error, ErrorKind, MemoryStore, RecordingHost, RequestSpec, ResponseEnvelope, TransportError,
};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn success_codes_resolve_with_the_exact_body() {
    let mut fixture = MockServerFixture::new().await;
    for (route, code) in [("/api/a", 0), ("/api/b", 200)] {
        let body = envelope(code, "ok", json!({"items": [1, 2, 3]}));
        let mock = fixture
            .server
            .mock("GET", route)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(&body)
            .create_async()
            .await;

        let got = fixture.client.dispatch(RequestSpec::get(route)).await.unwrap();
        let expected: ResponseEnvelope = serde_json::from_str(&body).unwrap();
        assert_eq!(got, expected);
        mock.assert_async().await;
    }
    assert!(fixture.host.events().is_empty());
}

#[tokio::test]
async fn bearer_token_is_attached_and_reread_every_call() {
    let mut fixture = MockServerFixture::new().await;
    fixture.sign_in("first");

    let m1 = fixture
        .server
        .mock("GET", "/api/user/info")
        .match_header("authorization", "Bearer first")
        .with_body(envelope(0, "", json!({"id": 1})))
        .create_async()
        .await;
    fixture.client.user().info().await.unwrap();
    m1.assert_async().await;

    // Another code path swaps the token; the next call must see it.
    fixture.sign_in("second");
    let m2 = fixture
        .server
        .mock("GET", "/api/user/info")
        .match_header("authorization", "Bearer second")
        .with_body(envelope(0, "", json!({"id": 1})))
        .create_async()
        .await;
    fixture.client.user().info().await.unwrap();
    m2.assert_async().await;
}

#[tokio::test]
async fn missing_token_omits_the_header() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/api/categories")
        .match_header("authorization", Matcher::Missing)
        .match_header("content-type", "application/json")
        .with_body(envelope(0, "", json!([])))
        .create_async()
        .await;
    fixture.client.categories().list().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_tears_down_then_redirects_after_delay() {
    let mut fixture = MockServerFixture::new().await;
    fixture.sign_in("stale");
    let _mock = fixture
        .server
        .mock("GET", "/api/knowledge/5")
        .with_status(401)
        // Success-looking body must not matter.
        .with_body(envelope(0, "ok", json!({})))
        .create_async()
        .await;

    let err = fixture.client.knowledge().detail(5).await.unwrap_err();
    assert!(matches!(err, Error::AuthExpired));
    assert_eq!(err.kind(), ErrorKind::AuthExpired);

    // Session already forgotten when the caller sees the error.
    assert!(fixture.token().is_none());
    assert!(fixture.client.auth().user_profile().is_none());
    assert!(fixture.store.is_empty());
    assert_eq!(fixture.host.notices(), vec![SESSION_EXPIRED_NOTICE.to_string()]);
    assert!(fixture.host.relaunches().is_empty(), "redirect must not precede the delay");

    tokio::time::sleep(REDIRECT_DELAY + Duration::from_millis(300)).await;

    let events = fixture.host.events();
    assert_eq!(events.len(), 2);
    let (noticed_at, _) = &events[0];
    let (redirected_at, event) = &events[1];
    assert_eq!(event, &HostEvent::Relaunch(LOGIN_ROUTE.to_string()));
    let waited = *redirected_at - *noticed_at;
    assert!(waited >= REDIRECT_DELAY, "redirected after {waited:?}");
    assert!(waited < REDIRECT_DELAY + Duration::from_millis(250), "redirected after {waited:?}");
}

#[tokio::test]
async fn business_failure_rejects_with_message_and_keeps_session() {
    let mut fixture = MockServerFixture::new().await;
    fixture.sign_in("tok");
    let _mock = fixture
        .server
        .mock("POST", "/api/categories")
        .with_status(200)
        .with_body(envelope(1, "Category already exists", json!(null)))
        .create_async()
        .await;

    let err = fixture
        .client
        .categories()
        .create(json!({"name": "rust"}))
        .await
        .unwrap_err();

    match &err {
        Error::Business { message, envelope } => {
            assert_eq!(message, "Category already exists");
            assert_eq!(envelope.code, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fixture.token().as_deref(), Some("tok"));
    assert_eq!(fixture.host.notices(), vec!["Category already exists".to_string()]);
    assert!(fixture.host.relaunches().is_empty());
}

#[tokio::test]
async fn business_failure_without_message_uses_generic_notice() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("GET", "/api/user/stats")
        .with_body(r#"{"code": 500}"#)
        .create_async()
        .await;

    let err = fixture.client.user().stats().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Business);
    assert_eq!(fixture.host.notices(), vec!["Request failed".to_string()]);
}

#[tokio::test]
async fn null_message_is_still_a_business_failure() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("GET", "/api/user/stats")
        .with_body(r#"{"code":1,"message":null,"data":null}"#)
        .create_async()
        .await;

    let err = fixture.client.user().stats().await.unwrap_err();
    match &err {
        Error::Business { message, envelope } => {
            assert_eq!(message, "Request failed");
            assert_eq!(envelope.code, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fixture.host.notices(), vec!["Request failed".to_string()]);
}

#[tokio::test]
async fn other_statuses_are_transport_failures_without_side_effects() {
    let mut fixture = MockServerFixture::new().await;
    fixture.sign_in("tok");
    let _mock = fixture
        .server
        .mock("GET", "/api/chat/conversations")
        .with_status(500)
        .with_body(envelope(1, "boom", json!(null)))
        .create_async()
        .await;

    let err = fixture.client.chat().conversations().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Status { status: 500 })
    ));
    assert_eq!(fixture.token().as_deref(), Some("tok"));
    assert!(fixture.host.events().is_empty());
}

#[tokio::test]
async fn non_json_200_body_is_a_transport_failure() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("GET", "/api/monitor/messages")
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let err = fixture.client.monitor().messages().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::MalformedBody(_))
    ));
    assert!(fixture.host.events().is_empty());
}

#[tokio::test]
async fn timeout_surfaces_as_transport_failure() {
    let (base_url, server) = silent_server().await;
    let store = Arc::new(MemoryStore::new());
    let host = RecordingHost::default();
    let client = client_for(&base_url, store.clone(), host.clone());
    client.auth().save_session("tok", None).unwrap();

    let deadline = Duration::from_millis(200);
    let err = client
        .dispatch(RequestSpec::get("/api/user/info").timeout(deadline))
        .await
        .unwrap_err();

    match err {
        Error::Transport(TransportError::Timeout(d)) => assert_eq!(d, deadline),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(client.auth().token().as_deref(), Some("tok"));
    assert!(host.events().is_empty());
    server.abort();
}

#[tokio::test]
async fn refused_connection_is_a_transport_failure() {
    let base_url = refused_address().await;
    let store = Arc::new(MemoryStore::new());
    let host = RecordingHost::default();
    let client = client_for(&base_url, store, host.clone());
    client.auth().save_session("tok", None).unwrap();

    let err = client.categories().list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(client.auth().token().as_deref(), Some("tok"));
    assert!(host.events().is_empty());
}

#[tokio::test]
async fn concurrent_dispatches_get_their_own_envelopes() {
    let mut fixture = MockServerFixture::new().await;
    let _a = fixture
        .server
        .mock("GET", "/api/knowledge/1")
        .with_body(envelope(0, "", json!({"id": 1})))
        .create_async()
        .await;
    let _b = fixture
        .server
        .mock("GET", "/api/categories")
        .with_body(envelope(200, "", json!([{"id": 9}])))
        .create_async()
        .await;

    let knowledge = fixture.client.knowledge();
    let categories = fixture.client.categories();
    let (k, c) = tokio::join!(knowledge.detail(1), categories.list());
    assert_eq!(k.unwrap(), json!({"id": 1}));
    assert_eq!(c.unwrap(), json!([{"id": 9}]));
}

#[tokio::test]
async fn get_payload_becomes_query_and_post_payload_becomes_json_body() {
    let mut fixture = MockServerFixture::new().await;
    let list = fixture
        .server
        .mock("GET", "/api/knowledge")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("keyword".into(), "async rust".into()),
        ]))
        .with_body(envelope(0, "", json!({"items": []})))
        .create_async()
        .await;
    let search = fixture
        .server
        .mock("POST", "/api/knowledge/search")
        .match_body(Matcher::Json(json!({"query": "tokio", "mode": "semantic"})))
        .with_body(envelope(0, "", json!({"items": []})))
        .create_async()
        .await;

    fixture
        .client
        .knowledge()
        .list(json!({"page": 2, "keyword": "async rust"}))
        .await
        .unwrap();
    fixture
        .client
        .knowledge()
        .search(json!({"query": "tokio", "mode": "semantic"}))
        .await
        .unwrap();
    list.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn caller_headers_are_forwarded() {
    let mut fixture = MockServerFixture::new().await;
    fixture.sign_in("tok");
    let mock = fixture
        .server
        .mock("PUT", "/api/knowledge/3")
        .match_header("x-client-version", "4.2")
        .match_header("authorization", "Bearer tok")
        .with_body(envelope(0, "", json!({"id": 3})))
        .create_async()
        .await;

    fixture
        .client
        .dispatch(
            RequestSpec::put("/api/knowledge/3")
                .payload(json!({"title": "t"}))
                .header("X-Client-Version", "4.2")
                .header("Authorization", "Bearer spoofed"),
        )
        .await
        .unwrap();
    mock.assert_async().await;
}
