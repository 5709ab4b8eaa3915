//! Helper utilities to launch the points tracker API server.

use std::{future::Future, net::SocketAddr, sync::Arc};

use api::{self, ApiState};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use eyre::Result;
use runtime::health;
mod rate_limit;
use rate_limit::RateLimitLayer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

/// Version prefix for all API routes.
pub const API_VERSION: &str = "v1";

/// Build the API router with CORS, rate limiting and tracing layers.
pub fn router(state: ApiState, allowed_origins: Vec<String>) -> Router {
    let allowed = Arc::new(allowed_origins);
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate({
            let allowed = Arc::clone(&allowed);
            move |origin: &HeaderValue, _| match origin.to_str() {
                Ok(origin) => {
                    allowed.iter().any(|o| o == origin)
                        || origin.starts_with("http://localhost:")
                        || origin.starts_with("http://127.0.0.1:")
                }
                Err(_) => false,
            }
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let max_requests = state.max_requests();
    let rate_period = state.rate_period();
    let api_service = tower::ServiceBuilder::new()
        .layer(RateLimitLayer::new(max_requests, rate_period))
        .service(api::router(state));

    Router::new()
        .route("/health", get(health::handler))
        .nest_service(&format!("/{API_VERSION}"), api_service)
        .layer(cors)
        .layer(trace)
}

/// Run the API server on the given address until `shutdown` resolves.
pub async fn run<F>(
    addr: SocketAddr,
    state: ApiState,
    allowed_origins: Vec<String>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state, allowed_origins);

    info!("Starting API server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("API server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{ApiState, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD};
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use driver::{
        PointsTracker,
        testing::{self, FakeChain, FakeStore},
    };
    use primitives::PointsParams;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn build_app(allowed: Vec<String>, max_requests: u64, period: Duration) -> Router {
        let tracker = PointsTracker::new(
            Arc::new(FakeChain::new(300_000)),
            Arc::new(FakeStore::default()),
            testing::config(PointsParams::default()),
        );
        router(ApiState::new(tracker, max_requests, period), allowed)
    }

    fn default_app() -> Router {
        build_app(default_origins(), DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD)
    }

    fn default_origins() -> Vec<String> {
        config::DEFAULT_ALLOWED_ORIGINS.split(',').map(|s| s.to_owned()).collect()
    }

    async fn send_request(app: Router, origin: &str) -> (StatusCode, Value, Option<String>) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{API_VERSION}/params"))
                    .header("Origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let cors = response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body, cors)
    }

    #[tokio::test]
    async fn health_is_unversioned() {
        let resp = default_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn allows_default_origin() {
        let (status, body, cors) = send_request(default_app(), "https://cygaar.xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["start_block"], 257_810);
        assert_eq!(cors.as_deref(), Some("https://cygaar.xyz"));
    }

    #[tokio::test]
    async fn allows_extra_origin() {
        let mut origins = default_origins();
        origins.push("https://example.com".to_owned());
        let app = build_app(origins, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD);
        let (status, _, cors) = send_request(app, "https://example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn allows_localhost_origin() {
        let (status, _, cors) = send_request(default_app(), "http://localhost:8080").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("http://localhost:8080"));
    }

    #[tokio::test]
    async fn denies_other_origin() {
        let (status, _, cors) = send_request(default_app(), "https://notallowed.com").await;
        assert_eq!(status, StatusCode::OK);
        assert!(cors.is_none());
    }

    #[tokio::test]
    async fn rate_limit_applies_to_versioned_routes() {
        let app = build_app(default_origins(), 1, Duration::from_secs(60));

        let (status, _, _) = send_request(app.clone(), "https://cygaar.xyz").await;
        assert_eq!(status, StatusCode::OK);
        let (status, body, _) = send_request(app.clone(), "https://cygaar.xyz").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["type"], "rate-limited");

        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
