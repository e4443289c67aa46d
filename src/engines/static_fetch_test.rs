// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;
use crate::domain::models::crawl::FailureKind;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_domain(server: &MockServer) -> Domain {
    Domain::parse(&server.address().to_string()).unwrap()
}

fn engine(timeout_secs: u64, retry: RetryPolicy) -> StaticFetch {
    let settings = StaticFetchSettings {
        timeout_secs,
        ..StaticFetchSettings::default()
    };
    StaticFetch::new(&settings, "http", retry).unwrap()
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(20),
        enable_jitter: false,
        ..RetryPolicy::none()
    }
}

#[tokio::test]
async fn test_static_fetch_returns_homepage_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><body><a href=\"/product/1\">x</a></body></html>"),
        )
        .mount(&server)
        .await;

    let html = engine(5, RetryPolicy::none())
        .fetch(&local_domain(&server))
        .await
        .unwrap();

    assert!(html.contains("/product/1"));
}

#[tokio::test]
async fn test_static_fetch_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = engine(5, RetryPolicy::none())
        .fetch(&local_domain(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus(404)));
    assert_eq!(err.kind(), FailureKind::Network);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_static_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = engine(1, RetryPolicy::none())
        .fetch(&local_domain(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::RequestFailed(ref e) if e.is_timeout()));
    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn test_static_fetch_retries_server_errors_up_to_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = engine(5, fast_retry(2))
        .fetch(&local_domain(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus(503)));
    // expect(3) is verified when the server is dropped
}

#[tokio::test]
async fn test_static_fetch_connection_refused() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let domain = Domain::parse(&addr.to_string()).unwrap();
    let err = engine(2, RetryPolicy::none()).fetch(&domain).await.unwrap_err();

    assert!(matches!(err, FetchError::RequestFailed(_)));
    assert_eq!(err.kind(), FailureKind::Network);
}

#[test]
fn test_static_fetch_kind_and_name() {
    let engine = engine(5, RetryPolicy::none());
    assert_eq!(engine.kind(), StrategyKind::Static);
    assert_eq!(engine.name(), "static");
}
