//! HTTP route source and end-to-end service tests against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use naviguide::{
    DataSource, HttpRouteSource, MemoryStore, NaviguideError, RetryConfig, RouteCacheService,
    RouteSource,
};

fn routes_body() -> serde_json::Value {
    json!([
        { "id": 1, "name": "Coast Trail", "description": "Cliffs and coves" },
        { "id": 2, "name": "Old Town" }
    ])
}

fn route_body(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Coast Trail",
        "description": "Cliffs and coves",
        "waypoints": [
            { "id": 10, "name": "Lighthouse", "description": "", "lat": 54.52, "lng": 18.55, "route_id": id },
            { "id": 11, "name": "Pier", "lat": 54.45, "lng": 18.57, "route_id": id },
            { "id": 12, "name": "Old Harbour", "description": "Ferry stop", "lat": 54.35, "lng": 18.66, "route_id": id }
        ]
    })
}

// ============================================================================
// HttpRouteSource
// ============================================================================

#[tokio::test]
async fn fetch_routes_parses_summaries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(routes_body()))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpRouteSource::with_base_url(server.uri()).unwrap();
    let routes = source.fetch_routes().await.unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].name, "Coast Trail");
    assert_eq!(routes[1].description, "");
    assert!(routes.iter().all(|r| r.waypoints.is_empty()));
}

#[tokio::test]
async fn fetch_route_parses_waypoints_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(1)))
        .mount(&server)
        .await;

    let source = HttpRouteSource::with_base_url(format!("{}/", server.uri())).unwrap();
    let route = source.fetch_route(1).await.unwrap();

    let names: Vec<_> = route.waypoints.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Lighthouse", "Pier", "Old Harbour"]);
    assert_eq!(route.waypoints[2].description, "Ferry stop");
}

#[tokio::test]
async fn missing_route_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = HttpRouteSource::with_base_url(server.uri()).unwrap();
    let err = source.fetch_route(99).await.unwrap_err();

    assert!(matches!(err, NaviguideError::NotFound(ref p) if p == "/routes/99"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let source = HttpRouteSource::with_base_url(server.uri()).unwrap();
    let err = source.fetch_routes().await.unwrap_err();

    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = HttpRouteSource::with_base_url(server.uri()).unwrap();
    let err = source.fetch_routes().await.unwrap_err();

    assert!(matches!(err, NaviguideError::Api { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = HttpRouteSource::with_base_url(server.uri()).unwrap();
    let err = source.fetch_routes().await.unwrap_err();

    assert!(matches!(err, NaviguideError::Json(_)));
}

#[tokio::test]
async fn unreachable_server_is_transient_http_error() {
    // Nothing listens on the discard port.
    let source =
        HttpRouteSource::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = source.fetch_routes().await.unwrap_err();

    assert!(matches!(err, NaviguideError::Http(_)));
    assert!(err.is_transient());
}

// ============================================================================
// End to end through the service
// ============================================================================

fn service_for(server: &MockServer, store: &MemoryStore) -> RouteCacheService {
    RouteCacheService::builder()
        .base_url(server.uri())
        .store(Arc::new(store.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn detail_is_requested_once_across_reads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(1)))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let service = service_for(&server, &store);

    let first = service.fetch_route_details(1).await.unwrap();
    let second = service.fetch_route_details(1).await.unwrap();

    assert_eq!(first.source, DataSource::Remote);
    assert_eq!(second.source, DataSource::Cache);
    assert_eq!(second.value.waypoints.len(), 3);
}

#[tokio::test]
async fn synchronized_routes_are_served_offline() {
    let store = MemoryStore::new();
    {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/routes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(routes_body()))
            .expect(1)
            .mount(&server)
            .await;
        for id in [1, 2] {
            Mock::given(method("GET"))
                .and(path(format!("/routes/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(route_body(id)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let report = service_for(&server, &store).synchronize_all().await.unwrap();
        assert!(report.is_complete());
    }

    // Server dropped: every read now has to come from the store.
    let offline = RouteCacheService::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(2))
        .store(Arc::new(store.clone()))
        .build()
        .unwrap();

    let routes = offline.fetch_all_routes().await.unwrap();
    assert_eq!(routes.value.len(), 2);
    let route = offline.fetch_route_details(2).await.unwrap();
    assert_eq!(route.value.id, 2);
    assert_eq!(route.value.waypoints[0].route_id, 2);
}

#[tokio::test]
async fn force_refresh_requests_every_endpoint_each_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(routes_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/routes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(1)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/routes/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(2)))
        .expect(2)
        .mount(&server)
        .await;

    let service = service_for(&server, &MemoryStore::new());
    service.force_refresh_routes().await.unwrap();
    let routes = service.force_refresh_routes().await.unwrap();

    assert_eq!(routes.len(), 2);
}

#[tokio::test]
async fn builder_retry_recovers_from_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(routes_body()))
        .expect(1)
        .mount(&server)
        .await;

    let service = RouteCacheService::builder()
        .base_url(server.uri())
        .store(Arc::new(MemoryStore::new()))
        .retry(
            RetryConfig::new()
                .max_attempts(2)
                .initial_delay(Duration::from_millis(1)),
        )
        .build()
        .unwrap();

    let routes = service.fetch_all_routes().await.unwrap();
    assert_eq!(routes.source, DataSource::Remote);
    assert_eq!(routes.value.len(), 2);
}
