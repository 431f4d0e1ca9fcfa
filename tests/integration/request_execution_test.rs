//! Request execution integration tests
//!
//! These tests run descriptors against a wiremock server and check what goes
//! over the wire, how responses are decoded and how failures are reported.

use super::{test_client, url};
use requester::{
    build_client, execute, execute_request, ExecutionConfig, HttpMethod, RequestContext,
    RequestError, Requester, RequesterConfig,
};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{any, body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_post_with_templated_body_headers_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(header("x-api-key", "secret"))
        .and(query_param("page", "2"))
        .and(body_json(json!({"name": "Ann", "count": 3})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 7, "tags": ["a", "b"]}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::POST, url(&server, "/users"))
        .header("X-Api-Key", "secret")
        .param("page", "2")
        .body(r#"{"name": "{{ name }}", "count": {{ count }}}"#)
        .body_param("name", "Ann")
        .body_param("count", "3");

    let executed = requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .expect("request succeeds");

    assert_eq!(executed.response["data"]["id"], 7);
    assert!(executed.curl.is_none());
}

#[tokio::test]
async fn test_get_descriptor_from_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let descriptor = json!({
        "url": url(&server, "/status"),
        "method": "GET",
        "headers": null,
        "params": {},
        "body": "",
        "bodyParam": null,
        "parseResponseValue": {"ok": "ok"}
    });
    let requester: Requester = serde_json::from_value(descriptor).unwrap();

    let executed = requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap();

    assert_eq!(executed.response, json!({"ok": true}));
    assert_eq!(requester.parse_response(&executed.response)["ok"], "true");
}

#[tokio::test]
async fn test_non_200_status_is_error_with_body_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/missing"));
    let err = requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "not found");
    assert_eq!(err.kind().status(), Some(404));
}

#[tokio::test]
async fn test_created_status_is_also_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::POST, url(&server, "/items"));
    let err = requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap_err();

    assert_eq!(err.kind().status(), Some(201));
}

#[tokio::test]
async fn test_unsupported_method_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::parse("HEAD"), url(&server, "/"));
    let err = requester
        .request(&test_client(), &RequestContext::new(), true)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), RequestError::UnsupportedMethod(m) if m == "HEAD"));
    assert!(err.curl.is_none());

    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_descriptor_without_method_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    for descriptor in [
        json!({"url": url(&server, "/")}),
        json!({"url": url(&server, "/"), "method": null}),
    ] {
        let requester: Requester = serde_json::from_value(descriptor).unwrap();
        let err = requester
            .request(&test_client(), &RequestContext::new(), false)
            .await
            .unwrap_err();

        assert!(matches!(err.kind(), RequestError::UnsupportedMethod(m) if m.is_empty()));
    }

    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_invalid_json_response_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/"));
    let err = requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), RequestError::Decode(_)));
}

#[tokio::test]
async fn test_non_object_json_depends_on_target_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/list"));
    let client = test_client();
    let ctx = RequestContext::new();

    let err = requester.request(&client, &ctx, false).await.unwrap_err();
    assert!(matches!(err.kind(), RequestError::Decode(_)));

    let executed = execute::<Vec<u32>>(&requester, &client, &ctx, false)
        .await
        .unwrap();
    assert_eq!(executed.response, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_debug_captures_curl_command() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/echo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::POST, url(&server, "/echo"))
        .header("Authorization", "Bearer t0k3n")
        .param("v", "1")
        .body(r#"{"user": "{{ user }}"}"#)
        .body_param("user", "ann");

    let executed = requester
        .request(&test_client(), &RequestContext::new(), true)
        .await
        .unwrap();

    let curl = executed.curl.expect("curl captured");
    assert!(curl.starts_with("curl -X POST"));
    assert!(curl.contains("-H 'authorization: Bearer t0k3n'"));
    assert!(curl.contains("-H 'content-type: application/json'"));
    assert!(curl.contains(r#"-d '{"user": "ann"}'"#));
    assert!(curl.ends_with(&format!("'{}/echo?v=1'", server.uri())));
}

#[tokio::test]
async fn test_debug_curl_is_kept_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::DELETE, url(&server, "/items/1"));
    let err = requester
        .request(&test_client(), &RequestContext::new(), true)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "boom");
    let curl = err.curl.expect("curl captured before sending");
    assert!(curl.contains("-X DELETE"));
    assert!(curl.contains("/items/1"));
}

#[tokio::test]
async fn test_caller_content_type_overrides_default() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(header("content-type", "text/plain"))
        .and(body_string("raw text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::PUT, url(&server, "/raw"))
        .header("Content-Type", "text/plain")
        .body("raw text");

    requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].headers.get_all("content-type").iter().count(), 1);
}

#[tokio::test]
async fn test_unknown_template_variable_renders_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({"known": "yes", "unknown": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::POST, url(&server, "/"))
        .body(r#"{"known": "{{ known }}", "unknown": "{{ nobody_set_this }}"}"#)
        .body_param("known", "yes");

    requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_body_is_not_sent() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::PATCH, url(&server, "/"));
    requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_template_error_aborts_before_sending() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::POST, url(&server, "/"))
        .body("{{ value | b64dec }}")
        .body_param("value", "not base64!");

    let err = requester
        .request(&test_client(), &RequestContext::new(), true)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), RequestError::TemplateRender(_)));
    assert!(err.curl.is_none());
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let ctx = RequestContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/slow"));
    let err = requester
        .request(&test_client(), &ctx, true)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), RequestError::Cancelled));
    assert!(err.curl.is_some());
}

#[tokio::test]
async fn test_context_deadline_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));
    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/slow"));
    let err = requester
        .request(&test_client(), &ctx, false)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), RequestError::Timeout));
}

#[tokio::test]
async fn test_client_timeout_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = build_client(&RequesterConfig {
        timeout: 100,
        ..Default::default()
    })
    .unwrap();

    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/slow"));
    let err = requester
        .request(&client, &RequestContext::new(), false)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), RequestError::Timeout));
}

#[tokio::test]
async fn test_execute_request_with_config() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cfg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 1})))
        .mount(&server)
        .await;

    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/cfg"));
    let executed = execute_request(&requester, &test_client(), &ExecutionConfig::new(5000, true))
        .await
        .unwrap();

    assert_eq!(executed.response, json!({"n": 1}));
    assert!(executed.curl.is_some());
}

#[tokio::test]
async fn test_default_headers_from_config_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("x-team", "core"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = RequesterConfig::default();
    config
        .default_headers
        .insert("X-Team".to_string(), "core".to_string());
    let client = build_client(&config).unwrap();

    let requester = Requester::with_url(HttpMethod::GET, url(&server, "/"));
    let executed = execute::<Value>(&requester, &client, &RequestContext::new(), false)
        .await
        .unwrap();
    assert_eq!(executed.response, json!({}));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Port 9 (discard) is not expected to accept connections
    let requester = Requester::with_url(HttpMethod::GET, "http://127.0.0.1:9/");
    let err = requester
        .request(&test_client(), &RequestContext::new(), false)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), RequestError::Transport(_)));
}
