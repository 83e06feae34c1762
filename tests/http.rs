// ABOUTME: Integration tests for the resilient HTTP client.
// ABOUTME: Covers every retry branch with a scripted transport and a paused clock.

mod support;

use edge_deploy::http::*;
use std::time::Duration;
use support::ScriptedTransport;
use tokio::time::Instant;

fn client(transport: &ScriptedTransport) -> ResilientClient<ScriptedTransport> {
    ResilientClient::new(transport.clone(), RetryPolicy::default())
}

/// The paused clock advances in whole timer ticks, so allow a little slack.
fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(20),
        "expected ~{expected:?}, got {elapsed:?}"
    );
}

fn request() -> HttpRequest {
    HttpRequest::get("https://edge.example.com/public/sun/open-api/v1/packages/")
}

mod status_handling {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn success_returns_immediately() {
        let transport = ScriptedTransport::new().respond(200, r#"{"count": 0}"#);

        let response = client(&transport).send(&request()).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.request_count(), 1);
    }

    /// Test: 401 fails fast with no second attempt.
    #[tokio::test(start_paused = true)]
    async fn unauthorized_is_never_retried() {
        let transport = ScriptedTransport::new()
            .respond(401, "bad token")
            .respond(200, "{}");

        let err = client(&transport).send(&request()).await.unwrap_err();

        assert_eq!(err.kind(), HttpErrorKind::Authentication);
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.remaining(), 1);
    }

    /// Test: non-429 4xx is handed back for the caller to interpret.
    #[tokio::test(start_paused = true)]
    async fn not_found_is_returned_without_retry() {
        let transport = ScriptedTransport::new().respond(404, "missing");

        let response = client(&transport).send(&request()).await.unwrap();

        assert_eq!(response, HttpResponse::new(404, "missing"));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn server_error_then_success() {
        let transport = ScriptedTransport::new()
            .respond(503, "busy")
            .respond(201, r#"{"id": 1}"#);

        let response = client(&transport).send(&request()).await.unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(transport.request_count(), 2);
    }
}

mod backoff {
    use super::*;

    /// Test: persistent 5xx is retried with 1s then 2s delays and the last response returned.
    #[tokio::test(start_paused = true)]
    async fn exhausted_server_errors_return_last_response() {
        let transport = ScriptedTransport::new()
            .respond(500, "one")
            .respond(502, "two")
            .respond(500, "three");

        let start = Instant::now();
        let response = client(&transport).send(&request()).await.unwrap();

        assert_eq!(response, HttpResponse::new(500, "three"));
        assert_eq!(transport.request_count(), 3);
        assert_elapsed(start, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_is_retried() {
        let transport = ScriptedTransport::new()
            .respond(429, "slow down")
            .respond(429, "slow down")
            .respond(200, "{}");

        let start = Instant::now();
        let response = client(&transport).send(&request()).await.unwrap();

        assert_eq!(response.status, 200);
        assert_elapsed(start, Duration::from_secs(3));
    }

    /// Test: 429 on every attempt returns the last 429 instead of an error.
    #[tokio::test(start_paused = true)]
    async fn exhausted_rate_limit_returns_last_response() {
        let transport = ScriptedTransport::new()
            .respond(429, "slow down")
            .respond(429, "slow down")
            .respond(429, "still busy");

        let start = Instant::now();
        let response = client(&transport).send(&request()).await.unwrap();

        assert_eq!(response, HttpResponse::new(429, "still busy"));
        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.remaining(), 0);
        assert_elapsed(start, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_are_retried() {
        let transport = ScriptedTransport::new()
            .connection_refused()
            .timeout()
            .respond(200, "{}");

        let response = client(&transport).send(&request()).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.request_count(), 3);
    }

    /// Test: transport failure on the last attempt becomes RequestFailed.
    #[tokio::test(start_paused = true)]
    async fn exhausted_transport_errors_fail() {
        let transport = ScriptedTransport::new()
            .timeout()
            .timeout()
            .connection_refused();

        let err = client(&transport).send(&request()).await.unwrap_err();

        assert_eq!(err.kind(), HttpErrorKind::RequestFailed);
        assert!(err.to_string().starts_with("request failed after 3 attempt(s)"));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_policy_controls_attempts_and_delay() {
        let transport = ScriptedTransport::new()
            .respond(500, "a")
            .respond(500, "b")
            .respond(500, "c")
            .respond(500, "d");
        let policy = RetryPolicy {
            max_attempts: 4,
            timeout: Duration::from_secs(5),
            backoff_base: Duration::from_millis(100),
        };

        let start = Instant::now();
        let response = ResilientClient::new(transport.clone(), policy)
            .send(&request())
            .await
            .unwrap();

        assert_eq!(response.body, "d");
        // 100ms + 200ms + 400ms
        assert_elapsed(start, Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_never_sleeps() {
        let transport = ScriptedTransport::new().respond(503, "down");
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };

        let start = Instant::now();
        let response = ResilientClient::new(transport.clone(), policy)
            .send(&request())
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_elapsed(start, Duration::ZERO);
    }
}

mod requests {
    use super::*;

    /// Test: the same request, body included, is re-sent on every attempt.
    #[tokio::test(start_paused = true)]
    async fn retries_resend_identical_multipart_body() {
        let transport = ScriptedTransport::new()
            .respond(500, "")
            .respond(201, "{}");
        let request = HttpRequest::post("https://edge.example.com/packages/").multipart(
            MultipartBody::default()
                .text("name", "app")
                .file(FilePart {
                    field: "package_file".into(),
                    file_name: "app-v1.tar.gz".into(),
                    content_type: "application/gzip".into(),
                    bytes: bytes::Bytes::from_static(b"archive"),
                }),
        );

        client(&transport).send(&request).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 2);
        for request in &sent {
            let RequestBody::Multipart(body) = &request.body else {
                panic!("expected multipart body");
            };
            assert_eq!(body.field("name"), Some("app"));
            assert_eq!(body.file.as_ref().unwrap().bytes.as_ref(), b"archive");
        }
    }
}
