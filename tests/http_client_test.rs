use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use storefront_search::cache::MemoryStore;
use storefront_search::config::SearchConfig;
use storefront_search::search::{
    ErrorKind, HttpSuggestClient, SearchError, SearchOrchestrator, SearchOutcome, SearchState,
    SuggestClient,
};

fn config_for(url: &str) -> SearchConfig {
    SearchConfig::builder()
        .base_url(url)
        .request_timeout(Duration::from_secs(2))
        .build()
        .expect("valid config")
}

fn suggest_body() -> String {
    json!({
        "resources": {
            "results": {
                "products": [
                    {
                        "id": 101,
                        "title": "Trail Runner",
                        "handle": "trail-runner",
                        "url": "/products/trail-runner",
                        "price": "89.00",
                        "vendor": "Summit",
                        "type": "Shoes",
                        "available": true,
                        "image": "https://cdn.example.com/runner.jpg"
                    },
                    { "handle": "mystery-item" }
                ]
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_suggest_sends_expected_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/suggest.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "running shoes".into()),
            Matcher::UrlEncoded("resources[type]".into(), "product".into()),
            Matcher::UrlEncoded("resources[limit]".into(), "8".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(suggest_body())
        .create_async()
        .await;

    let client = HttpSuggestClient::new(&config_for(&server.url())).expect("client");
    let products = client.suggest("running shoes", 8).await.expect("products");
    mock.assert_async().await;

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, 101);
    assert_eq!(products[0].product_type, "Shoes");
    assert_eq!(products[0].image.as_deref(), Some("https://cdn.example.com/runner.jpg"));

    // Sparse records degrade field by field
    assert_eq!(products[1].title, "Untitled product");
    assert_eq!(products[1].url, "/products/mystery-item");
    assert_eq!(products[1].price, "");
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search/suggest.json")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("retry-after", "12")
        .create_async()
        .await;

    let client = HttpSuggestClient::new(&config_for(&server.url())).expect("client");
    let error = client.suggest("hats", 10).await.expect_err("rate limited");

    assert_eq!(
        error,
        SearchError::RateLimited {
            retry_after: Some(Duration::from_secs(12))
        }
    );
    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn test_server_error_is_generic() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search/suggest.json")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = HttpSuggestClient::new(&config_for(&server.url())).expect("client");
    let error = client.suggest("hats", 10).await.expect_err("server error");

    assert_eq!(error, SearchError::Http { status: 500 });
    assert_eq!(error.kind(), ErrorKind::Generic);
}

#[tokio::test]
async fn test_malformed_bodies_are_parse_errors() {
    let mut server = Server::new_async().await;
    let client = HttpSuggestClient::new(&config_for(&server.url())).expect("client");

    for body in ["<html>maintenance</html>", "", r#"{"resources":{"results":{}}}"#] {
        let mock = server
            .mock("GET", "/search/suggest.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let error = client.suggest("hats", 10).await.expect_err("parse error");
        assert_eq!(error.kind(), ErrorKind::Parse, "body {body:?}");
        mock.remove_async().await;
    }
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client =
        HttpSuggestClient::new(&config_for(&format!("http://127.0.0.1:{port}"))).expect("client");

    let error = client.suggest("hats", 10).await.expect_err("refused");
    assert_eq!(error.kind(), ErrorKind::Network);
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_orchestrator_over_http_caches_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/suggest.json")
        .match_query(Matcher::UrlEncoded("q".into(), "trail".into()))
        .with_status(200)
        .with_body(suggest_body())
        .expect(1)
        .create_async()
        .await;

    let search = SearchOrchestrator::http(config_for(&server.url()), Arc::new(MemoryStore::new()))
        .expect("orchestrator");

    let first = search.search("trail").await;
    let second = search.search("TRAIL").await;
    mock.assert_async().await;

    assert!(matches!(first, SearchOutcome::Results { from_cache: false, .. }));
    assert!(matches!(second, SearchOutcome::Results { from_cache: true, .. }));
    assert_eq!(search.state(), SearchState::Results);
}
